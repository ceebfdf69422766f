use anyhow::{bail, Result};
use std::time::Duration;

/// When the server re-reads the offerings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Load once at startup
    Startup,
    /// Re-read before every request
    PerRequest,
    /// Re-read when the cached table is older than the interval
    Every(Duration),
}

impl ReloadPolicy {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "startup" | "never" => Ok(ReloadPolicy::Startup),
            "per-request" | "always" => Ok(ReloadPolicy::PerRequest),
            _ => {
                let interval = humantime::parse_duration(s)?;
                if interval.is_zero() {
                    bail!("Reload interval must be greater than zero: {}", s);
                }
                Ok(ReloadPolicy::Every(interval))
            }
        }
    }

    /// Whether a table loaded `age` ago must be re-read.
    pub fn is_stale(&self, age: Duration) -> bool {
        match self {
            ReloadPolicy::Startup => false,
            ReloadPolicy::PerRequest => true,
            ReloadPolicy::Every(interval) => age >= *interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(ReloadPolicy::parse("startup").unwrap(), ReloadPolicy::Startup);
        assert_eq!(ReloadPolicy::parse("never").unwrap(), ReloadPolicy::Startup);
        assert_eq!(
            ReloadPolicy::parse(" per-request ").unwrap(),
            ReloadPolicy::PerRequest
        );
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(
            ReloadPolicy::parse("10m").unwrap(),
            ReloadPolicy::Every(Duration::from_secs(600))
        );
        assert_eq!(
            ReloadPolicy::parse("1h 30m").unwrap(),
            ReloadPolicy::Every(Duration::from_secs(5400))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ReloadPolicy::parse("sometimes").is_err());
        assert!(ReloadPolicy::parse("0s").is_err());
    }

    #[test]
    fn test_is_stale() {
        let hour = Duration::from_secs(3600);
        assert!(!ReloadPolicy::Startup.is_stale(hour * 100));
        assert!(ReloadPolicy::PerRequest.is_stale(Duration::ZERO));
        assert!(!ReloadPolicy::Every(hour).is_stale(Duration::from_secs(10)));
        assert!(ReloadPolicy::Every(hour).is_stale(hour));
    }
}

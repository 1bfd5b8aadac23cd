use crate::destination::Destination;
use crate::error::PartialWriteError;
use std::sync::Arc;

/// Combines N destinations into one logical destination.
///
/// A write is forwarded to every member; a failing member never
/// prevents delivery to the others. Failures are collected after every
/// member has been attempted and reported together, naming the members
/// that failed.
pub struct FanOut {
    members: Vec<Arc<dyn Destination>>,
}

impl FanOut {
    pub fn new(members: Vec<Arc<dyn Destination>>) -> Self {
        Self { members }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Deliver one encoded record to every member.
    pub fn write(&self, bytes: &[u8]) -> Result<(), PartialWriteError> {
        let mut failures = Vec::new();
        for member in &self.members {
            if let Err(e) = member.write(bytes) {
                failures.push((member.name().to_string(), e));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(PartialWriteError { failures })
        }
    }

    /// Flush every member, regardless of earlier failures.
    pub fn sync(&self) -> Result<(), PartialWriteError> {
        let mut failures = Vec::new();
        for member in &self.members {
            if let Err(e) = member.sync() {
                failures.push((member.name().to_string(), e));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(PartialWriteError { failures })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Recording;
    use super::*;

    #[test]
    fn delivers_to_every_member() {
        let a = Recording::new("a");
        let b = Recording::new("b");
        let fanout = FanOut::new(vec![a.clone(), b.clone()]);

        fanout.write(b"hello\n").unwrap();
        assert_eq!(a.lines(), vec!["hello\n"]);
        assert_eq!(b.lines(), vec!["hello\n"]);
    }

    #[test]
    fn one_failure_does_not_block_the_others() {
        let bad = Recording::failing("bad");
        let good = Recording::new("good");
        let fanout = FanOut::new(vec![bad.clone(), good.clone()]);

        let err = fanout.write(b"hello\n").unwrap_err();
        assert_eq!(good.lines(), vec!["hello\n"]);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].0, "bad");
        assert!(err.to_string().contains("bad"));
        assert!(!err.to_string().contains("good"));
    }

    #[test]
    fn sync_attempts_every_member() {
        let bad = Recording::failing("bad");
        let good = Recording::new("good");
        let fanout = FanOut::new(vec![bad, good]);

        let err = fanout.sync().unwrap_err();
        assert_eq!(err.failures.len(), 1);
    }
}

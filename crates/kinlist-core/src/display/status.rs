//! One-line confirmations for operations without a record to show.

use std::fmt;

pub struct OperationStatus {
    pub message: String,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Success: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Pinned friend 2".to_string());
        assert_eq!(success.to_string(), "Success: Pinned friend 2\n");
    }
}

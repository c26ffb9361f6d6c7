// Console error report

use std::io::Write;

use crate::types::StorageError;

/// Writes the console report for a failed operation.
pub fn print_error<W: Write>(err: &StorageError, out: &mut W) -> std::io::Result<()> {
    match err {
        StorageError::Service(e) => {
            writeln!(
                out,
                "Caught a service error: the request reached S3 but was rejected with an error response."
            )?;
            writeln!(out, "Error Message:    {}", e.message)?;
            writeln!(out, "HTTP Status Code: {}", e.status_code)?;
            writeln!(out, "AWS Error Code:   {}", e.error_code.as_deref().unwrap_or("-"))?;
            writeln!(out, "Error Type:       {}", e.error_type)?;
            writeln!(out, "Request ID:       {}", e.request_id.as_deref().unwrap_or("-"))?;
        }
        StorageError::Client(message) => {
            writeln!(
                out,
                "Caught a client error: the client could not complete the request, \
                 such as not being able to reach the network."
            )?;
            writeln!(out, "Error Message: {}", message)?;
        }
    }
    Ok(())
}

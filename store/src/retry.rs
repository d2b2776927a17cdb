use std::io;

/// Run `op`, retrying exactly once on a transient I/O error.
///
/// `NotFound`, `AlreadyExists` and `InvalidInput` are answers rather than
/// glitches and are returned straight away.
pub fn retry_once<T>(what: &str, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    match op() {
        Ok(value) => Ok(value),
        Err(e) if !is_transient(&e) => Err(e),
        Err(e) => {
            tracing::warn!(operation = what, "Storage I/O failed, retrying once: {e}");
            op()
        }
    }
}

fn is_transient(err: &io::Error) -> bool {
    !matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::AlreadyExists | io::ErrorKind::InvalidInput
    )
}

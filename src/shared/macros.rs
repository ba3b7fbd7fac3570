/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a result or logs the error and exits. For initialization steps the
/// demo binary cannot run without, such as building the dispatcher.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    };
}

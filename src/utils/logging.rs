/// Logs at info level while debug mode is on (F1), at trace level otherwise.
/// Takes anything with a `debug_mode: bool` field, usually `Res<DebugSettings>`.
#[macro_export]
macro_rules! debug_log {
    ($debug_settings:expr, $($arg:tt)*) => {
        if $debug_settings.debug_mode {
            bevy::log::info!(target: "isoviewer::debug", $($arg)*);
        } else {
            bevy::log::trace!(target: "isoviewer::debug", $($arg)*);
        }
    };
}

pub(crate) fn default_user_agent() -> String {
    // Identifies this tool in the service logs.
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into()
}

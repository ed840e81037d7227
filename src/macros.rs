/// Builds a [`Properties`](crate::Properties) mapping from `key => value` pairs.
///
/// Keys and values may be anything implementing `ToString`; entries keep the
/// order they are written in.
///
/// # Examples
///
/// ```rust
/// use serde_properties::properties;
///
/// let props = properties! {
///     "server.host" => "localhost",
///     "server.port" => 8080,
///     "server.tls" => true,
/// };
///
/// assert_eq!(props.len(), 3);
/// assert_eq!(props.get("server.port"), Some("8080"));
/// assert_eq!(props.get("server.tls"), Some("true"));
///
/// let empty = properties! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! properties {
    () => {
        $crate::Properties::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::Properties::new();
        $(
            props.insert(($key).to_string(), ($value).to_string());
        )+
        props
    }};
}

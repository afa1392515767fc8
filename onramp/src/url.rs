//! Deterministic purchase URL assembly.

use crate::params::{ParamValue, Params};

/// Assembles a purchase URL from a base origin and ordered parameters.
///
/// Parameters are emitted as `key=value` pairs joined with `&`, in
/// insertion order. [`ParamValue::Text`] values are percent-encoded exactly
/// once; [`ParamValue::Encoded`] values were encoded by the builder and
/// pass through verbatim, so double-encoding cannot occur.
/// [`ParamValue::List`] values encode each element and join with bare
/// commas.
///
/// An empty parameter list yields the base URL unchanged (no `?`).
#[must_use]
pub fn assemble(base_url: &str, params: &Params) -> String {
    if params.is_empty() {
        return base_url.to_owned();
    }

    let query = params
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                ParamValue::Text(text) => urlencoding::encode(text).into_owned(),
                ParamValue::List(items) => items
                    .iter()
                    .map(|item| urlencoding::encode(item).into_owned())
                    .collect::<Vec<_>>()
                    .join(","),
                ParamValue::Encoded(encoded) => encoded.clone(),
            };
            format!("{key}={rendered}")
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{base_url}?{query}")
}

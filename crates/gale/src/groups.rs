//! Variant group shorthand: `hover:(p-1 m-2)` → `hover:p-1 hover:m-2`.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VARIANT_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([!\w+:_/-]+?)([:-])\(((?:[~!\w\s:/\\,%#.$-]|\[.*?\])*?)\)")
        .expect("valid variant group regex")
});

/// Expand every variant group in `code`, one level deep.
///
/// A `!` on an item stays in front (`sm:(!p-1)` → `!sm:p-1`) and `~` stands
/// for the bare prefix (`text-(~ lg)` → `text text-lg`). Borrowed when there
/// is nothing to expand.
pub fn expand_variant_groups(code: &str) -> Cow<'_, str> {
    VARIANT_GROUP.replace_all(code, |caps: &Captures| {
        let prefix = &caps[1];
        let separator = &caps[2];
        caps[3]
            .split_whitespace()
            .map(|item| {
                if item == "~" {
                    return prefix.to_string();
                }
                match item.strip_prefix('!') {
                    Some(rest) => format!("!{}{}{}", prefix, separator, rest),
                    None => format!("{}{}{}", prefix, separator, item),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    })
}

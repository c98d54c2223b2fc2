//! Known HTML tag names.

/// Always preflighted, whether or not they appear in source.
pub const PREFLIGHT_TAGS: &[&str] = &["html", "body", "div"];

/// Tags that can be claimed by detection.
pub const HTML_TAGS: &[&str] = &[
    "html", "base", "head", "link", "meta", "style", "title", "body", "address", "article",
    "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6", "hgroup", "main", "nav",
    "section", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "hr", "li", "ol",
    "p", "pre", "ul", "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em",
    "i", "kbd", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span", "strong", "sub",
    "summary", "sup", "time", "u", "var", "wbr", "area", "audio", "img", "map", "track",
    "video", "embed", "iframe", "object", "param", "picture", "portal", "source", "svg",
    "math", "canvas", "noscript", "script", "del", "ins", "caption", "col", "colgroup", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "button", "datalist", "fieldset", "form",
    "input", "label", "legend", "meter", "optgroup", "option", "output", "progress", "select",
    "textarea", "details", "dialog", "menu", "slot", "template", "acronym", "big",
    "center", "font", "marquee", "tt",
];

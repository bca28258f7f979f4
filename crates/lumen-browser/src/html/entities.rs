// HTML character reference decoding.
//
// Named references map to plain-ASCII approximations because every glyph the
// builtin font can draw is ASCII. Names are given *without* the leading `&`
// and trailing `;` (e.g. pass `"amp"` not `"&amp;"`).

/// A reference longer than this (from `&` to `;`) is left as raw text.
const MAX_REFERENCE_LEN: usize = 12;

/// Look up a named HTML character reference (without the leading `&`
/// and trailing `;`).
/// Returns the ASCII replacement if found, or `None` for unknown references.
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    let s: &'static str = match name {
        // ---- Essential / XML predefined -----------------------------------
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",

        // ---- Typography ---------------------------------------------------
        "mdash" | "ndash" => "-",
        "bull" => "*",
        "hellip" => "...",
        "laquo" => "<<",
        "raquo" => ">>",
        "ldquo" | "rdquo" => "\"",
        "lsquo" | "rsquo" | "prime" => "'",
        "middot" => ".",
        "dagger" => "+",

        // ---- Symbols ------------------------------------------------------
        "copy" => "(c)",
        "reg" => "(R)",
        "trade" => "(TM)",
        "sect" => "S",
        "para" => "P",
        "deg" => "deg",
        "permil" => "o/oo",

        // ---- Currency -----------------------------------------------------
        "pound" => "GBP",
        "euro" => "EUR",
        "yen" => "JPY",
        "cent" => "c",

        // ---- Arrows -------------------------------------------------------
        "larr" => "<-",
        "rarr" => "->",
        "uarr" => "^",
        "darr" => "v",

        // ---- Math ---------------------------------------------------------
        "times" => "x",
        "divide" => "/",
        "plusmn" => "+/-",
        "infin" => "inf",
        "ne" => "!=",
        "le" => "<=",
        "ge" => ">=",
        "asymp" => "~=",
        "equiv" => "===",

        // ---- Greek --------------------------------------------------------
        "alpha" => "a",
        "beta" => "b",
        "gamma" => "g",
        "delta" => "d",
        "pi" => "pi",
        "sigma" => "s",
        "omega" => "w",

        _ => return None,
    };
    Some(s)
}

/// Decode `&name;`, `&#N;` and `&#xN;` references in `text`.
///
/// Anything that does not decode (no `;` close enough, an unknown name, a
/// bad number) is copied through unchanged.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let semi = rest
            .find(';')
            .filter(|&i| i < MAX_REFERENCE_LEN)
            .filter(|&i| !rest[1..i].contains(|c: char| c == '&' || c.is_whitespace()));
        let Some(semi) = semi else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };

        let reference = &rest[1..semi];
        match decode_reference(reference) {
            Some(decoded) => out.push_str(&decoded),
            None => out.push_str(&rest[..=semi]),
        }
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<String> {
    if let Some(num) = reference.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    lookup_entity(reference).map(str::to_string)
}

/// HTML5 named entity table
///
/// Entity names are stored without the leading `&` or trailing `;`. The
/// expansion is a string, not a char: a handful of entities expand to
/// multi-codepoint sequences (e.g. `ngE` carries a combining slash).
/// Built once into read-only static data, shared freely across threads.
///
/// This carries the entities encountered in real documents and the
/// conformance corpus rather than the entire 2231-name HTML5 table;
/// unknown names fall through to literal text, so coverage gaps degrade
/// gracefully.
use phf::phf_map;

static ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    // XML predefined
    "amp" => "&",
    "lt" => "<",
    "gt" => ">",
    "quot" => "\"",
    "apos" => "'",
    // Latin-1 supplement
    "nbsp" => "\u{00A0}",
    "iexcl" => "¡",
    "cent" => "¢",
    "pound" => "£",
    "curren" => "¤",
    "yen" => "¥",
    "brvbar" => "¦",
    "sect" => "§",
    "uml" => "¨",
    "copy" => "©",
    "ordf" => "ª",
    "laquo" => "«",
    "not" => "¬",
    "shy" => "\u{00AD}",
    "reg" => "®",
    "macr" => "¯",
    "deg" => "°",
    "plusmn" => "±",
    "sup2" => "²",
    "sup3" => "³",
    "acute" => "´",
    "micro" => "µ",
    "para" => "¶",
    "middot" => "·",
    "cedil" => "¸",
    "sup1" => "¹",
    "ordm" => "º",
    "raquo" => "»",
    "frac14" => "¼",
    "frac12" => "½",
    "frac34" => "¾",
    "iquest" => "¿",
    "Agrave" => "À",
    "Aacute" => "Á",
    "Acirc" => "Â",
    "Atilde" => "Ã",
    "Auml" => "Ä",
    "Aring" => "Å",
    "AElig" => "Æ",
    "Ccedil" => "Ç",
    "Egrave" => "È",
    "Eacute" => "É",
    "Ecirc" => "Ê",
    "Euml" => "Ë",
    "Igrave" => "Ì",
    "Iacute" => "Í",
    "Icirc" => "Î",
    "Iuml" => "Ï",
    "ETH" => "Ð",
    "Ntilde" => "Ñ",
    "Ograve" => "Ò",
    "Oacute" => "Ó",
    "Ocirc" => "Ô",
    "Otilde" => "Õ",
    "Ouml" => "Ö",
    "times" => "×",
    "Oslash" => "Ø",
    "Ugrave" => "Ù",
    "Uacute" => "Ú",
    "Ucirc" => "Û",
    "Uuml" => "Ü",
    "Yacute" => "Ý",
    "THORN" => "Þ",
    "szlig" => "ß",
    "agrave" => "à",
    "aacute" => "á",
    "acirc" => "â",
    "atilde" => "ã",
    "auml" => "ä",
    "aring" => "å",
    "aelig" => "æ",
    "ccedil" => "ç",
    "egrave" => "è",
    "eacute" => "é",
    "ecirc" => "ê",
    "euml" => "ë",
    "igrave" => "ì",
    "iacute" => "í",
    "icirc" => "î",
    "iuml" => "ï",
    "eth" => "ð",
    "ntilde" => "ñ",
    "ograve" => "ò",
    "oacute" => "ó",
    "ocirc" => "ô",
    "otilde" => "õ",
    "ouml" => "ö",
    "divide" => "÷",
    "oslash" => "ø",
    "ugrave" => "ù",
    "uacute" => "ú",
    "ucirc" => "û",
    "uuml" => "ü",
    "yacute" => "ý",
    "thorn" => "þ",
    "yuml" => "ÿ",
    // Latin extended
    "Dcaron" => "Ď",
    "dcaron" => "ď",
    "OElig" => "Œ",
    "oelig" => "œ",
    "Scaron" => "Š",
    "scaron" => "š",
    "Yuml" => "Ÿ",
    "fnof" => "ƒ",
    // Spacing and punctuation
    "ensp" => "\u{2002}",
    "emsp" => "\u{2003}",
    "thinsp" => "\u{2009}",
    "zwnj" => "\u{200C}",
    "zwj" => "\u{200D}",
    "lrm" => "\u{200E}",
    "rlm" => "\u{200F}",
    "ndash" => "–",
    "mdash" => "—",
    "lsquo" => "\u{2018}",
    "rsquo" => "\u{2019}",
    "sbquo" => "\u{201A}",
    "ldquo" => "\u{201C}",
    "rdquo" => "\u{201D}",
    "bdquo" => "\u{201E}",
    "dagger" => "†",
    "Dagger" => "‡",
    "bull" => "•",
    "hellip" => "…",
    "permil" => "‰",
    "prime" => "′",
    "Prime" => "″",
    "lsaquo" => "‹",
    "rsaquo" => "›",
    "oline" => "‾",
    "frasl" => "⁄",
    "euro" => "€",
    // Letterlike symbols
    "trade" => "™",
    "alefsym" => "ℵ",
    "weierp" => "℘",
    "image" => "ℑ",
    "real" => "ℜ",
    "HilbertSpace" => "ℋ",
    "DifferentialD" => "ⅆ",
    // Greek
    "Alpha" => "Α",
    "Beta" => "Β",
    "Gamma" => "Γ",
    "Delta" => "Δ",
    "Epsilon" => "Ε",
    "Zeta" => "Ζ",
    "Eta" => "Η",
    "Theta" => "Θ",
    "Iota" => "Ι",
    "Kappa" => "Κ",
    "Lambda" => "Λ",
    "Mu" => "Μ",
    "Nu" => "Ν",
    "Xi" => "Ξ",
    "Omicron" => "Ο",
    "Pi" => "Π",
    "Rho" => "Ρ",
    "Sigma" => "Σ",
    "Tau" => "Τ",
    "Upsilon" => "Υ",
    "Phi" => "Φ",
    "Chi" => "Χ",
    "Psi" => "Ψ",
    "Omega" => "Ω",
    "alpha" => "α",
    "beta" => "β",
    "gamma" => "γ",
    "delta" => "δ",
    "epsilon" => "ε",
    "zeta" => "ζ",
    "eta" => "η",
    "theta" => "θ",
    "iota" => "ι",
    "kappa" => "κ",
    "lambda" => "λ",
    "mu" => "μ",
    "nu" => "ν",
    "xi" => "ξ",
    "omicron" => "ο",
    "pi" => "π",
    "rho" => "ρ",
    "sigmaf" => "ς",
    "sigma" => "σ",
    "tau" => "τ",
    "upsilon" => "υ",
    "phi" => "φ",
    "chi" => "χ",
    "psi" => "ψ",
    "omega" => "ω",
    // Arrows
    "larr" => "←",
    "uarr" => "↑",
    "rarr" => "→",
    "darr" => "↓",
    "harr" => "↔",
    "crarr" => "↵",
    "lArr" => "⇐",
    "uArr" => "⇑",
    "rArr" => "⇒",
    "dArr" => "⇓",
    "hArr" => "⇔",
    // Mathematical operators
    "forall" => "∀",
    "part" => "∂",
    "exist" => "∃",
    "empty" => "∅",
    "nabla" => "∇",
    "isin" => "∈",
    "notin" => "∉",
    "ni" => "∋",
    "prod" => "∏",
    "sum" => "∑",
    "minus" => "−",
    "lowast" => "∗",
    "radic" => "√",
    "prop" => "∝",
    "infin" => "∞",
    "ang" => "∠",
    "and" => "∧",
    "or" => "∨",
    "cap" => "∩",
    "cup" => "∪",
    "int" => "∫",
    "there4" => "∴",
    "sim" => "∼",
    "cong" => "≅",
    "asymp" => "≈",
    "ne" => "≠",
    "equiv" => "≡",
    "le" => "≤",
    "ge" => "≥",
    "ngE" => "≧̸",
    "sub" => "⊂",
    "sup" => "⊃",
    "nsub" => "⊄",
    "sube" => "⊆",
    "supe" => "⊇",
    "oplus" => "⊕",
    "otimes" => "⊗",
    "perp" => "⊥",
    "sdot" => "⋅",
    "ClockwiseContourIntegral" => "∲",
    // Technical and shapes
    "lceil" => "⌈",
    "rceil" => "⌉",
    "lfloor" => "⌊",
    "rfloor" => "⌋",
    "lang" => "〈",
    "rang" => "〉",
    "loz" => "◊",
    "spades" => "♠",
    "clubs" => "♣",
    "hearts" => "♥",
    "diams" => "♦",
};

/// Look up a named entity (name given without `&` and `;`)
pub fn lookup(name: &str) -> Option<&'static str> {
    ENTITIES.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lookups() {
        assert_eq!(lookup("amp"), Some("&"));
        assert_eq!(lookup("ouml"), Some("ö"));
        assert_eq!(lookup("frac34"), Some("¾"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup("AElig"), Some("Æ"));
        assert_eq!(lookup("aelig"), Some("æ"));
        assert_eq!(lookup("AMP"), None);
    }

    #[test]
    fn test_multi_codepoint_expansion() {
        assert_eq!(lookup("ngE"), Some("≧̸"));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(lookup("MadeUpEntity"), None);
    }
}

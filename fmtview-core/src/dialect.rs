//! Source dialects and the lightweight dialect detector.
//!
//! Detection is pattern-based, not a parse: two independent signals
//! (TypeScript-ish and JSX-ish) are evaluated against the raw text and
//! combined through a fixed decision table. A wrong guess only means the
//! formatter is handed the other parser family.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// One of the four supported source dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

/// The two parser families the formatting engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserFamily {
    /// Plain JavaScript and JSX.
    Babel,
    /// TypeScript and TSX.
    TypeScript,
}

impl ParserFamily {
    /// Parser name as passed to the engine's `--parser` flag.
    pub fn as_str(self) -> &'static str {
        match self {
            ParserFamily::Babel => "babel",
            ParserFamily::TypeScript => "typescript",
        }
    }
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [Dialect::JavaScript, Dialect::Jsx, Dialect::TypeScript, Dialect::Tsx];

    pub fn parser(self) -> ParserFamily {
        match self {
            Dialect::JavaScript | Dialect::Jsx => ParserFamily::Babel,
            Dialect::TypeScript | Dialect::Tsx => ParserFamily::TypeScript,
        }
    }

    /// Canonical file extension, used for download names and engine file hints.
    pub fn extension(self) -> &'static str {
        match self {
            Dialect::JavaScript => "js",
            Dialect::Jsx => "jsx",
            Dialect::TypeScript => "ts",
            Dialect::Tsx => "tsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dialect::JavaScript => "JavaScript",
            Dialect::Jsx => "JSX",
            Dialect::TypeScript => "TypeScript",
            Dialect::Tsx => "TSX",
        }
    }

    /// Maps an uploaded file's extension to a dialect (case-insensitive).
    ///
    /// Returns `None` for anything outside `js|mjs|cjs|jsx|ts|tsx`.
    pub fn from_extension(ext: &str) -> Option<Dialect> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            "jsx" => Some(Dialect::Jsx),
            "ts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user picked in the language selector.
///
/// `Auto` is a selection mode only; it is always resolved through [`detect`]
/// before a format runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageSelection {
    #[default]
    Auto,
    Fixed(Dialect),
}

impl LanguageSelection {
    /// Resolves the selection to an effective dialect for `source`.
    pub fn resolve(self, source: &str) -> Dialect {
        match self {
            LanguageSelection::Auto => detect(source),
            LanguageSelection::Fixed(d) => d,
        }
    }

    /// Parses a CLI/config name: `auto` or one of the dialect names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "auto" => Some(LanguageSelection::Auto),
            "javascript" | "js" => Some(LanguageSelection::Fixed(Dialect::JavaScript)),
            "jsx" => Some(LanguageSelection::Fixed(Dialect::Jsx)),
            "typescript" | "ts" => Some(LanguageSelection::Fixed(Dialect::TypeScript)),
            "tsx" => Some(LanguageSelection::Fixed(Dialect::Tsx)),
            _ => None,
        }
    }
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("detector pattern is valid and should always compile")
}

static TS_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // primitive annotation after a colon
        pattern(r":\s*(string|number|boolean|any|void|never|unknown|bigint|symbol|object)\b"),
        pattern(r"\binterface\s+[A-Za-z_$][\w$]*"),
        pattern(r"\btype\s+[A-Za-z_$][\w$]*\s*(<[^>]*>)?\s*="),
        // generic instantiation glued to an identifier: Array<Item>, useState<User>
        pattern(r"[\w$]<[A-Z][\w$]*"),
        pattern(r":\s*[A-Za-z_$][\w$]*\[\]"),
        pattern(r"\bas\s+(string|number|boolean|any|unknown|const)\b"),
    ]
});

static JSX_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // opening tag not glued to an identifier, so `Array<Item>` stays a generic
        pattern(r"(^|[^\w$])<[A-Z][\w$.]*[\s/>]"),
        pattern(r"</[A-Za-z][\w$.-]*>"),
        pattern(r"\b(className|on[A-Z][A-Za-z]*)\s*=\s*[{'\x22]"),
        pattern(r"<>|</>"),
        pattern(r"\bReact\."),
        pattern(r"\buse(State|Effect|Context|Reducer|Callback|Memo|Ref|LayoutEffect)\s*[<(]"),
    ]
});

fn any_match(signals: &[Regex], source: &str) -> bool {
    signals.iter().any(|re| re.is_match(source))
}

/// Best-guess dialect for `source`. Never fails; `JavaScript` when nothing fires.
pub fn detect(source: &str) -> Dialect {
    let ts = any_match(&TS_SIGNALS, source);
    let jsx = any_match(&JSX_SIGNALS, source);
    match (ts, jsx) {
        (true, true) => Dialect::Tsx,
        (true, false) => Dialect::TypeScript,
        (false, true) => Dialect::Jsx,
        (false, false) => Dialect::JavaScript,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_javascript_defaults() {
        assert_eq!(detect("const x = 1;\nfunction add(a, b) { return a + b; }"), Dialect::JavaScript);
        assert_eq!(detect(""), Dialect::JavaScript);
        assert_eq!(detect("}}}{{< <<< ::: \u{0}"), Dialect::JavaScript);
    }

    #[test]
    fn typescript_signals() {
        assert_eq!(detect("let n: number = 3;"), Dialect::TypeScript);
        assert_eq!(detect("interface User { id: string }"), Dialect::TypeScript);
        assert_eq!(detect("type Id = string | number;"), Dialect::TypeScript);
        assert_eq!(detect("const xs = new Array<Item>();"), Dialect::TypeScript);
        assert_eq!(detect("function f(xs: Item[]) {}"), Dialect::TypeScript);
        assert_eq!(detect("const k = ['a', 'b'] as const;"), Dialect::TypeScript);
    }

    #[test]
    fn jsx_signals() {
        assert_eq!(detect("const el = <App title=\"x\" />;"), Dialect::Jsx);
        assert_eq!(detect("return <div className=\"box\">hi</div>;"), Dialect::Jsx);
        assert_eq!(detect("const f = <>\n  <p>a</p>\n</>;"), Dialect::Jsx);
        assert_eq!(detect("const [a, setA] = useState(0);"), Dialect::Jsx);
        assert_eq!(detect("React.createElement('div');"), Dialect::Jsx);
        assert_eq!(detect("<button onClick={go}>"), Dialect::Jsx);
    }

    #[test]
    fn both_signals_is_tsx() {
        let src = "const n: number = 1;\nexport const C = () => <Card n={n} />;";
        assert_eq!(detect(src), Dialect::Tsx);
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(Dialect::from_extension("MJS"), Some(Dialect::JavaScript));
        assert_eq!(Dialect::from_extension("cjs"), Some(Dialect::JavaScript));
        assert_eq!(Dialect::from_extension("tsx"), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_extension("py"), None);
    }

    #[test]
    fn auto_selection_resolves_through_detector() {
        assert_eq!(LanguageSelection::Auto.resolve("let s: string"), Dialect::TypeScript);
        assert_eq!(LanguageSelection::Fixed(Dialect::Jsx).resolve("let s: string"), Dialect::Jsx);
        assert_eq!(LanguageSelection::from_name("TSX"), Some(LanguageSelection::Fixed(Dialect::Tsx)));
        assert_eq!(LanguageSelection::from_name("python"), None);
    }
}

//! Purpose: Render pretty JSON with optional ANSI colorization for CLI output.
//! Exports: colorize_json.
//! Role: Small, pure formatter used by CLI emission paths.
//! Invariants: When color is disabled, output equals serde_json::to_string_pretty.
//! Invariants: ANSI escapes appear only when explicitly enabled.
use serde_json::Value;

const INDENT: &str = "  ";

// Conservative 8/16-color palette for broad terminal compatibility.
struct Palette;

impl Palette {
    const KEY: &'static str = "36";
    const STRING: &'static str = "32";
    const NUMBER: &'static str = "33";
    const BOOL: &'static str = "35";
    const NULL: &'static str = "39";
    const PUNCT: &'static str = "39";
}

pub fn colorize_json(value: &Value, use_color: bool) -> String {
    let mut painter = Painter {
        use_color,
        out: String::new(),
    };
    painter.value(value, 0);
    painter.out
}

struct Painter {
    use_color: bool,
    out: String,
}

impl Painter {
    fn value(&mut self, value: &Value, indent: usize) {
        match value {
            Value::Null => self.paint("null", Palette::NULL),
            Value::Bool(val) => {
                let text = if *val { "true" } else { "false" };
                self.paint(text, Palette::BOOL);
            }
            Value::Number(num) => self.paint(&num.to_string(), Palette::NUMBER),
            Value::String(text) => {
                let encoded = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
                self.paint(&encoded, Palette::STRING);
            }
            Value::Array(items) => self.array(items, indent),
            Value::Object(map) => self.object(map, indent),
        }
    }

    fn array(&mut self, items: &[Value], indent: usize) {
        if items.is_empty() {
            self.paint("[]", Palette::PUNCT);
            return;
        }
        self.paint("[", Palette::PUNCT);
        self.out.push('\n');
        for (idx, item) in items.iter().enumerate() {
            self.indent(indent + 1);
            self.value(item, indent + 1);
            if idx + 1 < items.len() {
                self.paint(",", Palette::PUNCT);
            }
            self.out.push('\n');
        }
        self.indent(indent);
        self.paint("]", Palette::PUNCT);
    }

    fn object(&mut self, map: &serde_json::Map<String, Value>, indent: usize) {
        if map.is_empty() {
            self.paint("{}", Palette::PUNCT);
            return;
        }
        self.paint("{", Palette::PUNCT);
        self.out.push('\n');
        let len = map.len();
        for (idx, (key, value)) in map.iter().enumerate() {
            self.indent(indent + 1);
            let encoded = serde_json::to_string(key).unwrap_or_else(|_| "\"\"".to_string());
            self.paint(&encoded, Palette::KEY);
            self.paint(":", Palette::PUNCT);
            self.out.push(' ');
            self.value(value, indent + 1);
            if idx + 1 < len {
                self.paint(",", Palette::PUNCT);
            }
            self.out.push('\n');
        }
        self.indent(indent);
        self.paint("}", Palette::PUNCT);
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    fn paint(&mut self, text: &str, color: &str) {
        if !self.use_color {
            self.out.push_str(text);
            return;
        }
        self.out.push_str("\u{1b}[");
        self.out.push_str(color);
        self.out.push('m');
        self.out.push_str(text);
        self.out.push_str("\u{1b}[0m");
    }
}

#[cfg(test)]
mod tests {
    use super::colorize_json;
    use serde_json::json;

    #[test]
    fn colorize_json_matches_pretty_when_disabled() {
        let value = json!({
            "books": ["GEN", "EXO"],
            "nested": { "system": "English" }
        });
        let plain = colorize_json(&value, false);
        let pretty = serde_json::to_string_pretty(&value).expect("pretty");
        assert_eq!(plain, pretty);
    }

    #[test]
    fn colorize_json_emits_ansi_when_enabled() {
        let value = json!({"k":"v","n":1,"b":true,"z":null});
        let colored = colorize_json(&value, true);
        assert!(colored.contains("\u{1b}["));
        assert!(colored.contains("\u{1b}[36m\"k\"\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[32m\"v\"\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[33m1\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[35mtrue\u{1b}[0m"));
        assert!(colored.contains("\u{1b}[39mnull\u{1b}[0m"));
    }
}

//! SQL text helpers

use std::path::PathBuf;

/// Quote a string literal for DuckDB
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Escape glob metacharacters so DuckDB matches a path literally
///
/// DuckDB expands every `read_parquet` path as a glob; a one-character
/// class such as `[[]` matches only that character.
pub fn glob_escape(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Table function reading exactly the given Parquet part files
pub fn parquet_relation(parts: &[PathBuf]) -> String {
    let files: Vec<String> = parts
        .iter()
        .map(|part| quote_literal(&glob_escape(&part.to_string_lossy())))
        .collect();
    format!("read_parquet([{}])", files.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal_escapes_quotes() {
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_glob_escape() {
        assert_eq!(glob_escape("/data/run[1]/a?b*"), "/data/run[[]1]/a[?]b[*]");
        assert_eq!(glob_escape("/plain/path"), "/plain/path");
    }

    #[test]
    fn test_parquet_relation_lists_parts() {
        let relation = parquet_relation(&[
            PathBuf::from("/data/o'brien_sample/part-00000.parquet"),
            PathBuf::from("/data/o'brien_sample/part-00001.parquet"),
        ]);
        assert_eq!(
            relation,
            "read_parquet(['/data/o''brien_sample/part-00000.parquet', \
             '/data/o''brien_sample/part-00001.parquet'])"
        );
    }
}

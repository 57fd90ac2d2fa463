//! A log4rs encoder that renders the record's structured key/value pairs.
//!
//! The message is formatted by a regular [`PatternEncoder`]; every key/value
//! pair attached with `log`'s `kv` syntax is then appended as ` key=value`.
//! Values containing whitespace are quoted so a line stays splittable.

use std::io;

use log::{
    Record,
    kv::{Error, Key, Value, VisitSource},
};
use log4rs::encode::{Color, Encode, Style, Write, pattern::PatternEncoder};
use serde::Deserialize;

const DEFAULT_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}";

#[derive(Debug, Deserialize)]
pub struct KvConsoleEncoderConfig {
    pub pattern: Option<String>,
    /// Colour the keys. Defaults to `true`.
    pub highlight_keys: Option<bool>,
}

#[derive(Debug)]
pub struct KvConsoleEncoder {
    delegate: PatternEncoder,
    highlight_keys: bool,
}

impl KvConsoleEncoder {
    pub fn new(pattern: &str, highlight_keys: bool) -> Self {
        Self {
            delegate: PatternEncoder::new(pattern),
            highlight_keys,
        }
    }
}

impl Default for KvConsoleEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN, true)
    }
}

impl Encode for KvConsoleEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.delegate.encode(w, record)?;

        let mut visitor = PairWriter {
            writer: w,
            highlight_keys: self.highlight_keys,
            io_err: None,
        };
        if let Err(kv_err) = record.key_values().visit(&mut visitor) {
            if let Some(io_err) = visitor.io_err {
                return Err(io_err.into());
            }
            write!(w, " [kv error: {}]", kv_err)?;
        }

        w.write_all(b"\n")?;
        Ok(())
    }
}

struct PairWriter<'a> {
    writer: &'a mut dyn Write,
    highlight_keys: bool,
    io_err: Option<io::Error>,
}

impl PairWriter<'_> {
    fn write_pair(&mut self, key: &Key<'_>, value: &Value<'_>) -> io::Result<()> {
        if self.highlight_keys {
            self.writer.set_style(Style::new().text(Color::Cyan))?;
        }
        write!(self.writer, " {}=", key)?;
        if self.highlight_keys {
            self.writer.set_style(&Style::default())?;
        }

        let rendered = value.to_string();
        if rendered.is_empty() || rendered.contains(char::is_whitespace) {
            write!(self.writer, "{:?}", rendered)
        } else {
            self.writer.write_all(rendered.as_bytes())
        }
    }
}

impl<'kvs> VisitSource<'kvs> for PairWriter<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        if let Err(e) = self.write_pair(&key, &value) {
            self.io_err = Some(e);
            return Err(Error::msg("io error while writing key/value pair"));
        }
        Ok(())
    }
}

/// Registers the encoder under `kind: kv_console` in log4rs YAML.
pub struct KvConsoleEncoderDeserializer;

impl log4rs::config::Deserialize for KvConsoleEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = KvConsoleEncoderConfig;

    fn deserialize(
        &self,
        config: KvConsoleEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        let pattern = config.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        let highlight_keys = config.highlight_keys.unwrap_or(true);
        Ok(Box::new(KvConsoleEncoder::new(pattern, highlight_keys)))
    }
}

#[cfg(test)]
mod tests {
    use log::Level;
    use log4rs::encode::writer::simple::SimpleWriter;

    use super::*;

    fn render(pairs: &[(&str, &str)]) -> String {
        let encoder = KvConsoleEncoder::new("{m}", false);
        let mut buf = Vec::new();
        encoder
            .encode(
                &mut SimpleWriter(&mut buf),
                &Record::builder()
                    .level(Level::Info)
                    .args(format_args!("hello"))
                    .key_values(&pairs)
                    .build(),
            )
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn appends_pairs_after_message() {
        assert_eq!(render(&[("status", "200"), ("method", "GET")]), "hello status=200 method=GET\n");
    }

    #[test]
    fn quotes_values_with_spaces() {
        assert_eq!(render(&[("body", "two words")]), "hello body=\"two words\"\n");
    }

    #[test]
    fn no_pairs_is_just_the_message() {
        assert_eq!(render(&[]), "hello\n");
    }
}

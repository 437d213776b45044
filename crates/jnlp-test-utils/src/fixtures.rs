//! Manifest documents and zip archives for tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a manifest document element by element.
///
/// # Example
///
/// ```rust
/// use jnlp_test_utils::ManifestBuilder;
///
/// let xml = ManifestBuilder::new("https://host/app/")
///     .jar("viewer.jar")
///     .nativelib("Linux", "amd64", "natives.jar")
///     .main_class("com.example.Main")
///     .argument("host=10.0.0.1")
///     .build();
/// assert!(xml.contains("<jar href=\"viewer.jar\"/>"));
/// ```
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    spec: String,
    codebase: String,
    blocks: Vec<Block>,
    extra: Vec<String>,
    main_class: Option<String>,
    arguments: Vec<String>,
    application_desc: bool,
}

#[derive(Debug, Clone)]
struct Block {
    os: String,
    arch: String,
    items: Vec<String>,
}

impl ManifestBuilder {
    pub fn new(codebase: &str) -> Self {
        Self {
            spec: "1.0+".to_string(),
            codebase: codebase.to_string(),
            blocks: Vec::new(),
            extra: Vec::new(),
            main_class: None,
            arguments: Vec::new(),
            application_desc: false,
        }
    }

    pub fn spec(mut self, spec: &str) -> Self {
        self.spec = spec.to_string();
        self
    }

    /// `<property name=.. value="true"/>` in an unfiltered block.
    pub fn property(self, name: &str) -> Self {
        self.resource("", "", format!("<property name=\"{name}\" value=\"true\"/>"))
    }

    pub fn j2se(self, version: &str) -> Self {
        self.resource("", "", format!("<j2se version=\"{version}\"/>"))
    }

    pub fn jar(self, href: &str) -> Self {
        self.resource("", "", format!("<jar href=\"{href}\"/>"))
    }

    pub fn versioned_jar(self, href: &str, version: &str) -> Self {
        self.resource(
            "",
            "",
            format!("<jar href=\"{href}\" version=\"{version}\"/>"),
        )
    }

    /// `<nativelib>` inside a block filtered by `os`/`arch` (empty for any).
    pub fn nativelib(self, os: &str, arch: &str, href: &str) -> Self {
        self.resource(os, arch, format!("<nativelib href=\"{href}\"/>"))
    }

    /// Arbitrary markup inside a `<resources>` block.
    pub fn resource(mut self, os: &str, arch: &str, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        match self.blocks.last_mut() {
            Some(block) if block.os == os && block.arch == arch => block.items.push(fragment),
            _ => self.blocks.push(Block {
                os: os.to_string(),
                arch: arch.to_string(),
                items: vec![fragment],
            }),
        }
        self
    }

    /// Arbitrary markup directly under the root element.
    pub fn raw(mut self, fragment: &str) -> Self {
        self.extra.push(fragment.to_string());
        self
    }

    pub fn main_class(mut self, class: &str) -> Self {
        self.main_class = Some(class.to_string());
        self.application_desc = true;
        self
    }

    pub fn argument(mut self, arg: &str) -> Self {
        self.arguments.push(arg.to_string());
        self.application_desc = true;
        self
    }

    pub fn build(&self) -> String {
        let mut xml = format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<jnlp spec=\"{}\" codebase=\"{}\">\n",
            self.spec, self.codebase
        );
        xml.push_str("  <information><title>Test</title></information>\n");

        for block in &self.blocks {
            xml.push_str("  <resources");
            if !block.os.is_empty() {
                xml.push_str(&format!(" os=\"{}\"", block.os));
            }
            if !block.arch.is_empty() {
                xml.push_str(&format!(" arch=\"{}\"", block.arch));
            }
            xml.push_str(">\n");
            for item in &block.items {
                xml.push_str(&format!("    {item}\n"));
            }
            xml.push_str("  </resources>\n");
        }

        for fragment in &self.extra {
            xml.push_str(&format!("  {fragment}\n"));
        }

        if self.application_desc {
            xml.push_str("  <application-desc");
            if let Some(class) = &self.main_class {
                xml.push_str(&format!(" main-class=\"{class}\""));
            }
            xml.push_str(">\n");
            for arg in &self.arguments {
                xml.push_str(&format!("    <argument>{arg}</argument>\n"));
            }
            xml.push_str("  </application-desc>\n");
        }

        xml.push_str("</jnlp>\n");
        xml
    }
}

/// Zip archive held in memory. Names ending in `/` become directories.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_grouped_by_filter() {
        let xml = ManifestBuilder::new("http://h/")
            .property("jnlp.packEnabled")
            .jar("a.jar")
            .nativelib("Linux", "amd64", "n1.jar")
            .nativelib("Linux", "amd64", "n2.jar")
            .build();
        assert_eq!(xml.matches("<resources").count(), 2);
        assert!(xml.contains("<resources os=\"Linux\" arch=\"amd64\">"));
        assert!(!xml.contains("application-desc"));
    }

    #[test]
    fn test_zip_bytes_is_readable() {
        let bytes = zip_bytes(&[("lib/", b""), ("libx.so", b"elf")]);
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
    }
}

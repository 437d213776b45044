//! JNLP manifest parsing
//!
//! A manifest names a codebase, an application entry point and the
//! resources (application jar, native library bundles) to download. Only
//! the subset below is understood; anything else is rejected so that a
//! manifest is never half-interpreted.
//!
//! ```xml
//! <jnlp spec="1.0+" codebase="https://host/app/">
//!   <information>...</information>
//!   <resources>
//!     <property name="jnlp.versionEnabled" value="true"/>
//!     <j2se version="1.6+"/>
//!     <jar href="viewer.jar" version="2"/>
//!   </resources>
//!   <resources os="Linux" arch="amd64">
//!     <nativelib href="natives-linux64.jar"/>
//!   </resources>
//!   <application-desc main-class="com.example.Main">
//!     <argument>host=10.0.0.1</argument>
//!   </application-desc>
//! </jnlp>
//! ```

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use jnlp_fs::{PACK_SUFFIX, basename};
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::ManifestError;

const ROOT_ELEMENT: &str = "jnlp";
const SUPPORTED_SPEC: &str = "1.0+";
const PACK_ENABLED: &str = "jnlp.packEnabled";
const VERSION_ENABLED: &str = "jnlp.versionEnabled";

/// What a resource entry is used for once downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// The application archive put on the classpath
    Jar,
    /// A bundle whose top-level members are native libraries
    NativeLib,
}

/// One downloadable artifact declared by the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Path after version rewriting and pack-suffix append
    pub path: String,
    /// Required host OS, empty for any
    pub os: String,
    /// Required host architecture, empty for any
    pub arch: String,
    pub kind: ResourceKind,
}

impl ResourceEntry {
    /// Local file name of the downloaded artifact.
    pub fn basename(&self) -> &str {
        basename(&self.path)
    }
}

/// Parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDescriptor {
    codebase: String,
    main_class: Option<String>,
    arguments: Vec<String>,
    runtime_versions: BTreeSet<String>,
    resources: Vec<ResourceEntry>,
    primary_archive: Option<String>,
    native_bundles: Vec<String>,
}

/// Where the manifest document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Path(PathBuf),
    Stdin,
}

impl ManifestSource {
    /// `-` selects standard input, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    pub fn read(&self) -> Result<ManifestDescriptor, ManifestError> {
        match self {
            Self::Path(path) => ManifestDescriptor::load(path),
            Self::Stdin => ManifestDescriptor::from_reader(std::io::stdin().lock()),
        }
    }
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

impl ManifestDescriptor {
    /// Parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_str(&text)
    }

    /// Parse a manifest from any reader (e.g. standard input).
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ManifestError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse_str(&text)
    }

    /// Parse a manifest document.
    pub fn parse_str(text: &str) -> Result<Self, ManifestError> {
        let mut options = ParsingOptions::default();
        options.allow_dtd = true;
        let doc = Document::parse_with_options(text, options)?;
        Parser::new(&doc).parse()
    }

    /// Base URI relative resource paths are resolved against.
    pub fn codebase(&self) -> &str {
        &self.codebase
    }

    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Declared `j2se` versions. Recorded for diagnostics only.
    pub fn runtime_versions(&self) -> &BTreeSet<String> {
        &self.runtime_versions
    }

    pub fn resources(&self) -> &[ResourceEntry] {
        &self.resources
    }

    /// Basename of the application jar, without pack suffix.
    pub fn primary_archive(&self) -> Option<&str> {
        self.primary_archive.as_deref()
    }

    /// Basenames of native bundles, without pack suffix.
    pub fn native_bundles(&self) -> &[String] {
        &self.native_bundles
    }

    pub fn is_native_bundle(&self, name: &str) -> bool {
        self.native_bundles.iter().any(|n| n == name)
    }
}

/// Walks the document tree, accumulating the descriptor.
struct Parser<'a, 'input> {
    doc: &'a Document<'input>,
    pack_suffix: &'static str,
    versioned: bool,
    main_class: Option<String>,
    arguments: Vec<String>,
    runtime_versions: BTreeSet<String>,
    resources: Vec<ResourceEntry>,
    primary_archive: Option<String>,
    native_bundles: Vec<String>,
}

impl<'a, 'input> Parser<'a, 'input> {
    fn new(doc: &'a Document<'input>) -> Self {
        Self {
            doc,
            pack_suffix: "",
            versioned: false,
            main_class: None,
            arguments: Vec::new(),
            runtime_versions: BTreeSet::new(),
            resources: Vec::new(),
            primary_archive: None,
            native_bundles: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<ManifestDescriptor, ManifestError> {
        let root = self.doc.root_element();
        let name = root.tag_name().name();
        if name != ROOT_ELEMENT {
            return Err(ManifestError::UnexpectedRoot {
                name: name.to_string(),
            });
        }

        let spec = root.attribute("spec").unwrap_or("");
        if spec != SUPPORTED_SPEC {
            return Err(ManifestError::UnsupportedSpec {
                found: spec.to_string(),
            });
        }

        let codebase = root.attribute("codebase").unwrap_or("");
        if codebase.is_empty() {
            return Err(ManifestError::MissingCodebase);
        }

        for child in root.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "information" | "security" | "update" => {}
                "application-desc" => self.application_desc(child)?,
                "resources" => self.resources_block(child)?,
                other => return Err(self.unknown_element(other, child)),
            }
        }

        Ok(ManifestDescriptor {
            codebase: codebase.to_string(),
            main_class: self.main_class,
            arguments: self.arguments,
            runtime_versions: self.runtime_versions,
            resources: self.resources,
            primary_archive: self.primary_archive,
            native_bundles: self.native_bundles,
        })
    }

    fn application_desc(&mut self, node: Node<'_, '_>) -> Result<(), ManifestError> {
        self.main_class = node
            .attribute("main-class")
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        self.arguments.clear();
        for arg in node.children().filter(Node::is_element) {
            let mut children = arg.children();
            match (children.next(), children.next()) {
                (Some(text), None) if text.is_text() => {
                    self.arguments
                        .push(text.text().unwrap_or_default().to_string());
                }
                _ => {
                    return Err(ManifestError::MalformedArgument {
                        source_text: self.source_text(arg),
                    });
                }
            }
        }
        Ok(())
    }

    fn resources_block(&mut self, node: Node<'_, '_>) -> Result<(), ManifestError> {
        let os = node.attribute("os").unwrap_or("");
        let arch = node.attribute("arch").unwrap_or("");

        for child in node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "property" => self.property(child)?,
                "j2se" => {
                    if let Some(version) = child.attribute("version").filter(|v| !v.is_empty()) {
                        self.runtime_versions.insert(version.to_string());
                    }
                }
                "jar" => self.resource(child, ResourceKind::Jar, os, arch)?,
                "nativelib" => self.resource(child, ResourceKind::NativeLib, os, arch)?,
                other => return Err(self.unknown_element(other, child)),
            }
        }
        Ok(())
    }

    fn property(&mut self, node: Node<'_, '_>) -> Result<(), ManifestError> {
        let name = node.attribute("name").unwrap_or("");
        let value = node.attribute("value").unwrap_or("");
        if value != "true" {
            return Err(ManifestError::InvalidPropertyValue {
                name: name.to_string(),
                value: value.to_string(),
            });
        }

        match name {
            PACK_ENABLED => self.pack_suffix = PACK_SUFFIX,
            VERSION_ENABLED => self.versioned = true,
            _ => {
                return Err(ManifestError::UnknownProperty {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn resource(
        &mut self,
        node: Node<'_, '_>,
        kind: ResourceKind,
        os: &str,
        arch: &str,
    ) -> Result<(), ManifestError> {
        if kind == ResourceKind::Jar && (!os.is_empty() || !arch.is_empty()) {
            return Err(ManifestError::FilteredPrimaryArchive {
                href: node.attribute("href").unwrap_or_default().to_string(),
                os: os.to_string(),
                arch: arch.to_string(),
            });
        }

        let href = node
            .attribute("href")
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ManifestError::MissingHref {
                element: node.tag_name().name().to_string(),
            })?;

        let mut path = match node.attribute("version").filter(|v| !v.is_empty()) {
            Some(version) if self.versioned => versioned_path(href, version)?,
            _ => href.to_string(),
        };

        let name = basename(&path).to_string();
        match kind {
            ResourceKind::Jar => {
                if let Some(first) = self.primary_archive.take() {
                    return Err(ManifestError::DuplicatePrimaryArchive { first, second: name });
                }
                self.primary_archive = Some(name);
            }
            ResourceKind::NativeLib => self.native_bundles.push(name),
        }

        path.push_str(self.pack_suffix);
        self.resources.push(ResourceEntry {
            path,
            os: os.to_string(),
            arch: arch.to_string(),
            kind,
        });
        Ok(())
    }

    fn unknown_element(&self, name: &str, node: Node<'_, '_>) -> ManifestError {
        ManifestError::UnknownElement {
            name: name.to_string(),
            source_text: self.source_text(node),
        }
    }

    fn source_text(&self, node: Node<'_, '_>) -> String {
        self.doc
            .input_text()
            .get(node.range())
            .unwrap_or_default()
            .to_string()
    }
}

/// `foo.jar` at version `2` becomes `foo__V2.jar`.
fn versioned_path(href: &str, version: &str) -> Result<String, ManifestError> {
    let stem = href
        .strip_suffix(".jar")
        .ok_or_else(|| ManifestError::InvalidVersionedName {
            href: href.to_string(),
        })?;
    Ok(format!("{stem}__V{version}.jar"))
}

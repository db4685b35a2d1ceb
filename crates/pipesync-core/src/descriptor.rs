//! In-memory model of a content pipeline descriptor (`.mgcb`).
//!
//! The descriptor is kept as the exact sequence of lines read from disk.
//! Mutation is limited to appending entry blocks, inserting reference
//! lines and replacing a single reference line in place; nothing is ever
//! removed or reordered. Because every query sees all previously written
//! lines, running a synchronization twice produces no further edits.
//!
//! Entry block layout:
//!
//! ```text
//! #begin textures/hero.png
//! /importer:TextureImporter
//! /processor:TextureProcessor
//! /processorParam:ColorKeyEnabled=False
//! /build:textures/hero.png
//!
//! ```

use pipesync_fs::{NormalizedPath, io};

use crate::{Error, Result};

pub const BEGIN_PREFIX: &str = "#begin ";
pub const IMPORTER_PREFIX: &str = "/importer:";
pub const PROCESSOR_PREFIX: &str = "/processor:";
pub const PROCESSOR_PARAM_PREFIX: &str = "/processorParam:";
pub const BUILD_PREFIX: &str = "/build:";
pub const COPY_PREFIX: &str = "/copy:";
pub const REFERENCE_PREFIX: &str = "/reference:";
pub const CONTENT_MARKER: &str = "-- Content --";

/// Extension every descriptor file must carry.
pub const DESCRIPTOR_EXTENSION: &str = "mgcb";

/// Line sequence of a descriptor plus the formatting needed to write it
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
    dirty: bool,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            line_ending: "\n",
            trailing_newline: true,
            dirty: false,
        }
    }
}

impl Descriptor {
    /// Split descriptor text into lines.
    ///
    /// The terminator of the first line (`\n` or `\r\n`) is used for the
    /// whole file when it is rendered again.
    pub fn parse(content: &str) -> Self {
        if content.is_empty() {
            return Self::default();
        }

        let line_ending = match content.find('\n') {
            Some(idx) if idx > 0 && content.as_bytes()[idx - 1] == b'\r' => "\r\n",
            _ => "\n",
        };
        let trailing_newline = content.ends_with('\n');

        let body = if trailing_newline {
            &content[..content.len() - 1]
        } else {
            content
        };
        let lines = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            lines,
            line_ending,
            trailing_newline,
            dirty: false,
        }
    }

    /// Read a descriptor from disk.
    ///
    /// The file must exist and carry the `.mgcb` extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let has_extension = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(DESCRIPTOR_EXTENSION));
        if !has_extension || !path.is_file() {
            return Err(Error::InvalidDescriptor {
                path: path.to_native(),
            });
        }
        let content = io::read_text(path)?;
        Ok(Self::parse(&content))
    }

    /// Write the descriptor atomically and clear the dirty flag.
    pub fn save(&mut self, path: &NormalizedPath) -> Result<()> {
        io::write_text(path, &self.render())?;
        self.dirty = false;
        Ok(())
    }

    /// Render the full descriptor text.
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join(self.line_ending);
        if self.trailing_newline {
            out.push_str(self.line_ending);
        }
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any mutation happened since the descriptor was parsed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True iff a line exactly equal to `#begin <path>` exists.
    pub fn has_entry(&self, path: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.strip_prefix(BEGIN_PREFIX) == Some(path))
    }

    /// All `/reference:` lines as `(index, value)`, in file order.
    pub fn reference_lines(&self) -> Vec<(usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| line.strip_prefix(REFERENCE_PREFIX).map(|v| (idx, v)))
            .collect()
    }

    /// The reference values alone, in file order.
    pub fn reference_paths(&self) -> Vec<&str> {
        self.reference_lines().into_iter().map(|(_, v)| v).collect()
    }

    /// Index at which new reference lines belong.
    ///
    /// Directly after the last reference line if there is one, otherwise
    /// in front of the first entry block or content section marker, otherwise
    /// at the top of the file. The scan stops at the first build directive,
    /// so references further down are not considered.
    pub fn insertion_index(&self) -> usize {
        let mut index = 0;
        for (i, line) in self.lines.iter().enumerate() {
            if line.starts_with(REFERENCE_PREFIX) {
                index = i + 1;
            } else if is_build_directive(line) {
                if index == 0 {
                    index = i;
                }
                break;
            }
        }
        index
    }

    /// Append a standard build entry.
    pub fn append_entry(
        &mut self,
        path: &str,
        importer: &str,
        processor: &str,
        params: &[(String, String)],
    ) {
        self.lines.push(format!("{BEGIN_PREFIX}{path}"));
        self.lines.push(format!("{IMPORTER_PREFIX}{importer}"));
        self.lines.push(format!("{PROCESSOR_PREFIX}{processor}"));
        for (key, value) in params {
            self.lines
                .push(format!("{PROCESSOR_PARAM_PREFIX}{key}={value}"));
        }
        self.lines.push(format!("{BUILD_PREFIX}{path}"));
        self.end_block();
    }

    /// Append a copy-only entry.
    pub fn append_copy_entry(&mut self, path: &str) {
        self.lines.push(format!("{BEGIN_PREFIX}{path}"));
        self.lines.push(format!("{COPY_PREFIX}{path}"));
        self.end_block();
    }

    /// Close an entry block with a blank line. Appended lines are always
    /// terminated, even if the source file had no final newline.
    fn end_block(&mut self) {
        self.lines.push(String::new());
        self.trailing_newline = true;
        self.dirty = true;
    }

    /// Replace the reference line at `index` with `/reference:<value>`.
    ///
    /// Returns `false` and leaves the descriptor untouched when `index`
    /// does not point at a reference line.
    pub fn replace_reference_line(&mut self, index: usize, value: &str) -> bool {
        match self.lines.get_mut(index) {
            Some(line) if line.starts_with(REFERENCE_PREFIX) => {
                *line = format!("{REFERENCE_PREFIX}{value}");
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Insert `/reference:<value>` at `index`, shifting later lines down.
    ///
    /// Callers inserting several references must advance the index after
    /// each call to keep them in order. Indices past the end append.
    pub fn insert_reference_line(&mut self, index: usize, value: &str) {
        let index = index.min(self.lines.len());
        self.lines
            .insert(index, format!("{REFERENCE_PREFIX}{value}"));
        self.dirty = true;
    }
}

fn is_build_directive(line: &str) -> bool {
    line.starts_with(BEGIN_PREFIX)
        || line.starts_with(IMPORTER_PREFIX)
        || line.starts_with(PROCESSOR_PREFIX)
        || line.starts_with(BUILD_PREFIX)
        || line.contains(CONTENT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
#----------------------------- Global Properties ----------------------------#

/outputDir:bin/$(Platform)
/platform:DesktopGL

#-------------------------------- References --------------------------------#

/reference:../libs/Foo.dll
/reference:../libs/Bar.dll

#---------------------------------- Content ---------------------------------#

#begin textures/hero.png
/importer:TextureImporter
/processor:TextureProcessor
/build:textures/hero.png

";

    #[test]
    fn test_parse_render_roundtrip_lf() {
        let descriptor = Descriptor::parse(SAMPLE);
        assert_eq!(descriptor.render(), SAMPLE);
        assert!(!descriptor.is_dirty());
    }

    #[test]
    fn test_parse_render_roundtrip_crlf() {
        let content = SAMPLE.replace('\n', "\r\n");
        let descriptor = Descriptor::parse(&content);
        assert!(!descriptor.lines()[0].ends_with('\r'));
        assert_eq!(descriptor.render(), content);
    }

    #[test]
    fn test_missing_trailing_newline_is_preserved() {
        let descriptor = Descriptor::parse("/platform:DesktopGL\n#begin a.png");
        assert_eq!(descriptor.render(), "/platform:DesktopGL\n#begin a.png");
    }

    #[test]
    fn test_empty_descriptor() {
        let descriptor = Descriptor::parse("");
        assert!(descriptor.lines().is_empty());
        assert_eq!(descriptor.render(), "");
        assert_eq!(descriptor.insertion_index(), 0);
    }

    #[test]
    fn test_has_entry_is_exact() {
        let descriptor = Descriptor::parse(SAMPLE);
        assert!(descriptor.has_entry("textures/hero.png"));
        assert!(!descriptor.has_entry("textures/hero"));
        assert!(!descriptor.has_entry("textures/hero.png.bak"));
        assert!(!descriptor.has_entry("hero.png"));
    }

    #[test]
    fn test_reference_lines_in_file_order() {
        let descriptor = Descriptor::parse(SAMPLE);
        assert_eq!(
            descriptor.reference_lines(),
            vec![(7, "../libs/Foo.dll"), (8, "../libs/Bar.dll")]
        );
        assert_eq!(
            descriptor.reference_paths(),
            vec!["../libs/Foo.dll", "../libs/Bar.dll"]
        );
    }

    #[test]
    fn test_insertion_index_after_last_reference() {
        let descriptor = Descriptor::parse(SAMPLE);
        assert_eq!(descriptor.insertion_index(), 9);
    }

    #[test]
    fn test_insertion_index_before_content_marker() {
        let descriptor = Descriptor::parse(
            "/platform:DesktopGL\n\n# Content\n#-- Content --#\n",
        );
        assert_eq!(descriptor.insertion_index(), 3);
    }

    #[test]
    fn test_insertion_index_before_first_directive() {
        let descriptor =
            Descriptor::parse("/platform:DesktopGL\n#begin a.png\n/importer:TextureImporter\n");
        assert_eq!(descriptor.insertion_index(), 1);
    }

    #[test]
    fn test_insertion_index_ignores_references_after_directive() {
        let descriptor = Descriptor::parse("/build:a.png\n/reference:Foo.dll\n");
        assert_eq!(descriptor.insertion_index(), 0);
    }

    #[test]
    fn test_insertion_index_without_markers_is_top() {
        let descriptor = Descriptor::parse("/platform:DesktopGL\n/outputDir:bin\n");
        assert_eq!(descriptor.insertion_index(), 0);
    }

    #[test]
    fn test_append_entry_layout() {
        let mut descriptor = Descriptor::default();
        descriptor.append_entry(
            "fonts/main.spritefont",
            "FontDescriptionImporter",
            "FontDescriptionProcessor",
            &[
                ("PremultiplyAlpha".into(), "True".into()),
                ("TextureFormat".into(), "Compressed".into()),
            ],
        );
        assert!(descriptor.is_dirty());
        assert_eq!(
            descriptor.render(),
            "#begin fonts/main.spritefont\n\
             /importer:FontDescriptionImporter\n\
             /processor:FontDescriptionProcessor\n\
             /processorParam:PremultiplyAlpha=True\n\
             /processorParam:TextureFormat=Compressed\n\
             /build:fonts/main.spritefont\n\
             \n"
        );
    }

    #[test]
    fn test_append_copy_entry_layout() {
        let mut descriptor = Descriptor::default();
        descriptor.append_copy_entry("fonts/a.fnt");
        assert_eq!(descriptor.render(), "#begin fonts/a.fnt\n/copy:fonts/a.fnt\n\n");
    }

    #[test]
    fn test_append_terminates_file_without_final_newline() {
        let mut descriptor = Descriptor::parse("/platform:DesktopGL");
        descriptor.append_copy_entry("a.fnt");
        assert_eq!(
            descriptor.render(),
            "/platform:DesktopGL\n#begin a.fnt\n/copy:a.fnt\n\n"
        );

        let mut reparsed = Descriptor::parse(&descriptor.render());
        reparsed.append_entry("b.png", "TextureImporter", "TextureProcessor", &[]);
        assert!(
            reparsed
                .render()
                .ends_with("/copy:a.fnt\n\n#begin b.png\n/importer:TextureImporter\n/processor:TextureProcessor\n/build:b.png\n\n")
        );
    }

    #[test]
    fn test_replace_reference_line() {
        let mut descriptor = Descriptor::parse(SAMPLE);
        assert!(descriptor.replace_reference_line(7, "root/foo/2.0/tools/Foo.dll"));
        assert_eq!(descriptor.lines()[7], "/reference:root/foo/2.0/tools/Foo.dll");
        assert_eq!(descriptor.lines().len(), Descriptor::parse(SAMPLE).lines().len());
        assert!(descriptor.is_dirty());
    }

    #[test]
    fn test_replace_refuses_non_reference_line() {
        let mut descriptor = Descriptor::parse(SAMPLE);
        assert!(!descriptor.replace_reference_line(0, "x.dll"));
        assert!(!descriptor.replace_reference_line(999, "x.dll"));
        assert!(!descriptor.is_dirty());
    }

    #[test]
    fn test_insert_reference_lines_keep_order() {
        let mut descriptor = Descriptor::parse(SAMPLE);
        let mut index = descriptor.insertion_index();
        for value in ["a/A.dll", "b/B.dll"] {
            descriptor.insert_reference_line(index, value);
            index += 1;
        }
        assert_eq!(
            descriptor.reference_paths(),
            vec!["../libs/Foo.dll", "../libs/Bar.dll", "a/A.dll", "b/B.dll"]
        );
        assert_eq!(descriptor.lines()[11], "");
    }
}

//! Font discovery via fontconfig and installation into egui
//!
//! The clock font is resolved to a file once per font-name change and added
//! to egui's font definitions as its own named family.

use ab_glyph::Font as _;
use anyhow::{Context, Result};
use eframe::egui::{self, FontData, FontDefinitions, FontFamily};
use fontconfig::{Fontconfig, ObjectSet, Pattern};
use std::collections::BTreeMap;
use std::ffi::CString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Common font style names for parsing family+style strings
/// Order matters: longer/more specific styles must come first to avoid substring matches
/// (e.g., "SemiBold Italic" must be checked before "Bold Italic")
const KNOWN_STYLES: &[&str] = &[
    "Condensed Bold Italic",
    "Condensed Bold",
    "SemiBold Italic",
    "Bold Italic",
    "Bold Oblique",
    "Black Italic",
    "Medium Italic",
    "Light Italic",
    "Thin Italic",
    "ExtraBold",
    "ExtraLight",
    "SemiBold",
    "Italic",
    "Oblique",
    "Bold",
    "Light",
    "Medium",
    "Black",
    "Thin",
    "Regular",
    "Condensed",
    "Expanded",
];

/// Outline formats egui can rasterize
const SCALABLE_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Fontconfig aliases that resolve to whatever the system prefers
const GENERIC_FAMILIES: &[&str] = &["monospace", "sans-serif", "sans", "serif"];

pub fn is_generic_family(family: &str) -> bool {
    GENERIC_FAMILIES
        .iter()
        .any(|generic| generic.eq_ignore_ascii_case(family))
}

/// A font file and the face inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    pub path: PathBuf,
    pub index: u32,
}

impl FontFile {
    fn is_scalable(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SCALABLE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }
}

/// Picker label for a face: "Family Style", or just the family for Regular
fn face_name(family: &str, style: Option<&str>) -> String {
    match style {
        Some("Regular") | None => family.to_string(),
        Some(style) => format!("{family} {style}"),
    }
}

/// Every scalable installed face by picker label. The first face listed
/// under a label wins.
fn installed_faces(fc: &Fontconfig) -> BTreeMap<String, FontFile> {
    let pattern = Pattern::new(fc);
    let mut objects = ObjectSet::new(fc);
    for object in [fontconfig::FC_FAMILY, fontconfig::FC_STYLE, fontconfig::FC_FILE, fontconfig::FC_INDEX] {
        objects.add(object);
    }
    let font_set = fontconfig::list_fonts(&pattern, Some(&objects));

    let mut faces = BTreeMap::new();
    for font_pattern in font_set.iter() {
        let (Some(family), Some(path)) = (font_pattern.get_string(fontconfig::FC_FAMILY), font_pattern.filename())
        else {
            continue;
        };
        let file = FontFile {
            path: PathBuf::from(path),
            index: font_pattern.face_index().unwrap_or(0).max(0) as u32,
        };
        if !file.is_scalable() {
            continue;
        }
        let name = face_name(family, font_pattern.get_string(fontconfig::FC_STYLE));
        faces.entry(name).or_insert(file);
    }
    faces
}

/// Installed scalable fonts by full name ("DejaVu Sans Mono Bold"), sorted and deduplicated
pub fn list_fonts() -> Result<Vec<String>> {
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;
    let fonts: Vec<String> = installed_faces(&fc).into_keys().collect();

    info!(count = fonts.len(), "Discovered fonts via fontconfig");
    Ok(fonts)
}

/// Split "Family Name Style" into family and a known trailing style
fn split_style(font_name: &str) -> (&str, Option<&'static str>) {
    for style in KNOWN_STYLES {
        if let Some(prefix) = font_name.strip_suffix(style)
            && (prefix.is_empty() || prefix.ends_with(' '))
        {
            return (prefix.trim(), Some(style));
        }
    }
    (font_name, None)
}

/// Resolve a font name to a file. Names offered by `list_fonts` map to the
/// exact face fontconfig listed; anything else (a typed family, a generic
/// alias) goes through fontconfig matching.
pub fn find_font(font_name: &str) -> Result<FontFile> {
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;
    let font_name = font_name.trim();

    if let Some(file) = installed_faces(&fc).remove(font_name) {
        debug!(font = font_name, path = %file.path.display(), index = file.index, "Resolved listed font");
        return Ok(file);
    }

    let (family_name, style_name) = split_style(font_name);
    let mut pattern = Pattern::new(&fc);
    let family_cstr = CString::new(family_name)
        .with_context(|| format!("Invalid family name: {family_name}"))?;
    pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);
    if let Some(style) = style_name {
        let style_cstr =
            CString::new(style).with_context(|| format!("Invalid style name: {style}"))?;
        pattern.add_string(fontconfig::FC_STYLE, &style_cstr);
    }

    let matched = pattern.font_match();

    // Fontconfig always returns something; a different family means the
    // requested one is not installed. Generic aliases match any family.
    if !is_generic_family(family_name)
        && let Some(matched_family) = matched.get_string(fontconfig::FC_FAMILY)
        && !matched_family.eq_ignore_ascii_case(family_name)
    {
        anyhow::bail!("Font '{font_name}' not found, fontconfig returned family '{matched_family}'");
    }

    let path = PathBuf::from(
        matched
            .filename()
            .with_context(|| format!("No font file found for '{font_name}'"))?,
    );
    if !path.exists() {
        anyhow::bail!("Font file path '{}' does not exist", path.display());
    }

    debug!(font = font_name, family = family_name, style = ?style_name, path = %path.display(), "Resolved font path");
    Ok(FontFile {
        path,
        index: matched.face_index().unwrap_or(0).max(0) as u32,
    })
}

/// Read a font file and check that egui's rasterizer can use it
fn load_font(file: &FontFile) -> Result<Vec<u8>> {
    if !file.is_scalable() {
        anyhow::bail!("'{}' is not a TrueType/OpenType font", file.path.display());
    }
    let bytes = std::fs::read(&file.path)
        .with_context(|| format!("Failed to read font file: {}", file.path.display()))?;
    validate_font(&bytes, file.index)
        .with_context(|| format!("Unusable font file: {}", file.path.display()))?;
    Ok(bytes)
}

/// The checks egui makes when building its font atlas, which panics on failure
fn validate_font(bytes: &[u8], index: u32) -> Result<()> {
    let face = ab_glyph::FontRef::try_from_slice_and_index(bytes, index)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    if face.units_per_em().is_none() {
        anyhow::bail!("Units per em out of range");
    }
    Ok(())
}

/// Default definitions plus `name` as a family of its own, backed by the
/// monospace fonts for missing glyphs
pub fn font_definitions(name: &str, bytes: Vec<u8>, index: u32) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    let mut data = FontData::from_owned(bytes);
    data.index = index;
    fonts.font_data.insert(name.to_string(), Arc::new(data));

    let mut chain = vec![name.to_string()];
    if let Some(fallbacks) = fonts.families.get(&FontFamily::Monospace) {
        chain.extend(fallbacks.iter().cloned());
    }
    fonts.families.insert(FontFamily::Name(name.into()), chain);
    fonts
}

/// Keeps egui's fonts in step with the configured clock font
pub struct ClockFont {
    requested: Option<String>,
    family: FontFamily,
    /// egui applies new fonts at the start of the next pass; the named family
    /// does not exist before then
    usable_from_pass: u64,
}

impl Default for ClockFont {
    fn default() -> Self {
        Self {
            requested: None,
            family: FontFamily::Monospace,
            usable_from_pass: 0,
        }
    }
}

impl ClockFont {
    /// Family to paint the clock with this pass, installing `name` first if it changed
    pub fn family(&mut self, ctx: &egui::Context, name: &str) -> FontFamily {
        if self.requested.as_deref() != Some(name) {
            self.install(ctx, name);
        }
        if ctx.cumulative_pass_nr() >= self.usable_from_pass {
            self.family.clone()
        } else {
            FontFamily::Monospace
        }
    }

    fn install(&mut self, ctx: &egui::Context, name: &str) {
        self.requested = Some(name.to_string());

        let loaded = find_font(name).and_then(|file| load_font(&file).map(|bytes| (bytes, file.index)));

        match loaded {
            Ok((bytes, index)) => {
                info!(font = %name, "Installing clock font");
                ctx.set_fonts(font_definitions(name, bytes, index));
                self.family = FontFamily::Name(name.into());
                self.usable_from_pass = ctx.cumulative_pass_nr() + 1;
            }
            Err(e) => {
                warn!(font = %name, error = %e, "Font unavailable, using default monospace");
                ctx.set_fonts(FontDefinitions::default());
                self.family = FontFamily::Monospace;
                self.usable_from_pass = 0;
            }
        }
    }
}

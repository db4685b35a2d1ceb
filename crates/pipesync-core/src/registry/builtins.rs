//! Built-in capability registrations.
//!
//! The importers and processors that ship with the stock content
//! pipeline. These are always present; referenced libraries can only add
//! to them. Order matters for extension ties and must stay stable.

use super::ImporterDescriptor;

/// Number of built-in importers.
pub const BUILTIN_IMPORTER_COUNT: usize = 13;

/// Returns all built-in importer registrations, in registration order.
pub fn builtin_importers() -> Vec<ImporterDescriptor> {
    vec![
        ImporterDescriptor::new(
            "TextureImporter",
            &[
                ".bmp", ".dds", ".dib", ".gif", ".hdr", ".ico", ".jpg", ".jpeg", ".pcx", ".pfm",
                ".pgm", ".png", ".ppm", ".psd", ".tga", ".tif", ".tiff", ".webp",
            ],
            "TextureProcessor",
        ),
        ImporterDescriptor::new("FbxImporter", &[".fbx"], "ModelProcessor"),
        ImporterDescriptor::new("XImporter", &[".x"], "ModelProcessor"),
        ImporterDescriptor::new(
            "OpenAssetImporter",
            &[
                ".dae", ".obj", ".3ds", ".blend", ".ase", ".ply", ".dxf", ".lwo", ".stl", ".ms3d",
                ".b3d", ".md2", ".md3", ".md5mesh", ".smd", ".off",
            ],
            "ModelProcessor",
        ),
        ImporterDescriptor::new("EffectImporter", &[".fx"], "EffectProcessor"),
        ImporterDescriptor::new(
            "FontDescriptionImporter",
            &[".spritefont"],
            "FontDescriptionProcessor",
        ),
        ImporterDescriptor::new("XmlImporter", &[".xml"], "PassThroughProcessor"),
        ImporterDescriptor::new("WavImporter", &[".wav"], "SoundEffectProcessor"),
        ImporterDescriptor::new("Mp3Importer", &[".mp3"], "SongProcessor"),
        ImporterDescriptor::new("OggImporter", &[".ogg"], "SongProcessor"),
        ImporterDescriptor::new("WmaImporter", &[".wma"], "SongProcessor"),
        ImporterDescriptor::new("H264Importer", &[".mp4"], "VideoProcessor"),
        ImporterDescriptor::new("WmvImporter", &[".wmv"], "VideoProcessor"),
    ]
}

/// Returns all built-in processor names, in registration order.
pub fn builtin_processors() -> Vec<String> {
    [
        "PassThroughProcessor",
        "TextureProcessor",
        "ModelProcessor",
        "MaterialProcessor",
        "EffectProcessor",
        "FontDescriptionProcessor",
        "FontTextureProcessor",
        "LocalizedFontProcessor",
        "SoundEffectProcessor",
        "SongProcessor",
        "VideoProcessor",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

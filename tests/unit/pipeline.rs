use super::*;
use crate::tools::discover::{Converter, ConverterKind};

fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(6, 4, image::Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn unreachable_toolchain() -> Toolchain {
    Toolchain::new(
        "/nonexistent/primitive",
        Converter {
            kind: ConverterKind::Magick,
            path: PathBuf::from("/nonexistent/magick"),
        },
    )
}

#[test]
fn stem_uses_the_final_component() {
    assert_eq!(Upload::new("photos/cat.photo.png", vec![]).stem(), "cat.photo");
    assert_eq!(Upload::new("", vec![]).stem(), "upload");
}

#[test]
fn validate_accepts_png_and_reports_size() {
    let upload = Upload::new("Cat.PNG", tiny_png());
    assert_eq!(upload.validate().unwrap(), (6, 4));
}

#[test]
fn validate_rejects_bad_uploads() {
    let empty = Upload::new("a.png", vec![]);
    assert!(empty.validate().unwrap_err().to_string().contains("empty"));

    let wrong_ext = Upload::new("a.bmp", tiny_png());
    assert!(matches!(wrong_ext.validate(), Err(ArtError::Validation(_))));

    let not_an_image = Upload::new("a.jpg", b"hello world".to_vec());
    assert!(matches!(not_an_image.validate(), Err(ArtError::Validation(_))));
}

#[test]
fn invalid_params_fail_before_any_workspace_exists() {
    let base = tempfile::tempdir().unwrap();
    let generator = Generator::new(
        unreachable_toolchain(),
        GeneratorSettings {
            workspace_base: base.path().join("ws"),
        },
    );
    let params = GenerationParams {
        num_shapes: 1,
        ..GenerationParams::default()
    };

    let err = generator
        .generate(&Upload::new("cat.png", tiny_png()), &params)
        .unwrap_err();
    assert!(matches!(err, ArtError::Validation(_)), "{err}");
    assert!(!base.path().join("ws").exists());
}

#[test]
fn tool_spawn_failure_still_removes_workspace() {
    let base = tempfile::tempdir().unwrap();
    let generator = Generator::new(
        unreachable_toolchain(),
        GeneratorSettings {
            workspace_base: base.path().to_path_buf(),
        },
    );

    let err = generator
        .generate(&Upload::new("cat.png", tiny_png()), &GenerationParams::default())
        .unwrap_err();
    assert!(matches!(err, ArtError::ToolFailed { .. }), "{err}");
    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}

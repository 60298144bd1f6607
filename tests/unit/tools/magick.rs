use super::*;
use crate::tools::discover::ConverterKind;

fn converter(kind: ConverterKind, path: &str) -> Converter {
    Converter {
        kind,
        path: PathBuf::from(path),
    }
}

#[cfg(unix)]
#[test]
fn gif_command_uses_fixed_delay_loop_and_wildcard() {
    let line = gif_command(
        &converter(ConverterKind::Magick, "/usr/bin/magick"),
        Path::new("ws/frames"),
        Path::new("ws/outputs/cat_animation.gif"),
    );
    assert_eq!(line.tool_name(), "magick");
    assert_eq!(
        line.args_lossy(),
        [
            "-delay",
            "10",
            "-loop",
            "0",
            "ws/frames/*.png",
            "ws/outputs/cat_animation.gif",
        ]
    );
}

#[test]
fn frames_are_listed_in_order_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["0002.png", "0001.png", "0003.PNG", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }

    let frames = list_frames(dir.path()).unwrap();
    let names: Vec<_> = frames
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["0001.png", "0002.png", "0003.PNG"]);

    assert_eq!(remove_frames(dir.path()).unwrap(), 3);
    assert!(list_frames(dir.path()).unwrap().is_empty());
    assert!(dir.path().join("notes.txt").exists());
}

#[test]
fn assembling_without_frames_is_an_artifact_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = assemble_gif(
        &converter(ConverterKind::Convert, "/nonexistent/convert"),
        dir.path(),
        &dir.path().join("out.gif"),
    )
    .unwrap_err();
    assert!(matches!(err, ArtError::Artifact(_)), "{err}");
}

#[cfg(unix)]
#[test]
fn converter_failure_keeps_frames_for_workspace_cleanup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("0001.png"), b"x").unwrap();

    // `false` exits 1 without output.
    let err = assemble_gif(
        &converter(ConverterKind::Convert, "false"),
        dir.path(),
        &dir.path().join("out.gif"),
    )
    .unwrap_err();
    assert!(matches!(err, ArtError::ToolFailed { .. }), "{err}");
    assert_eq!(list_frames(dir.path()).unwrap().len(), 1);
}

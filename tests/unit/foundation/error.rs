use super::*;

#[test]
fn missing_tools_are_named_in_the_message() {
    let err = ArtError::missing_dependency("primitive and magick/convert not found on the search path");
    assert_eq!(
        err.to_string(),
        "missing dependency: primitive and magick/convert not found on the search path"
    );
}

#[test]
fn tool_failure_names_tool_status_and_detail() {
    let err = ArtError::tool_failed("primitive", "exit status: 2", "invalid input");
    assert_eq!(
        err.to_string(),
        "primitive exited with exit status: 2: invalid input"
    );
}

#[test]
fn user_message_matches_failure_kind() {
    assert_eq!(
        ArtError::missing_dependency("magick/convert not found on the search path").user_message(),
        "Missing required dependencies: Install Primitive and ImageMagick \
         (magick/convert not found on the search path)"
    );
    assert_eq!(
        ArtError::tool_failed("magick", "exit status: 1", "no images defined").user_message(),
        "Processing error: no images defined"
    );
    assert_eq!(
        ArtError::validation("alpha expects a number, got 'x'").user_message(),
        "Unexpected error: validation error: alpha expects a number, got 'x'"
    );
    assert_eq!(
        ArtError::artifact("expected output 'cat_result.png' was not produced").user_message(),
        "Unexpected error: artifact error: expected output 'cat_result.png' was not produced"
    );
}

#[test]
fn io_failures_keep_their_context_in_the_banner() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
    let err: ArtError = anyhow::Error::new(io)
        .context("failed to create workspace under '/srv/ws'")
        .into();
    assert_eq!(
        err.to_string(),
        "failed to create workspace under '/srv/ws'"
    );
    assert_eq!(
        err.user_message(),
        "Unexpected error: failed to create workspace under '/srv/ws'"
    );
}

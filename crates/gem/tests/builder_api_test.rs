//! Integration tests for the GemBuilder API
//!
//! These tests go through the public API only, the way an application
//! embedding the compiler would.

use std::{fs, path::PathBuf};

use gem::{
    FsLoader, GemBuilder, GemError, LoadError,
    color::Shade,
    config::{AppConfig, CompilerConfig, IncludeConfig},
    scene::Drawable,
    text::TextSpan,
};

fn no_includes(path: &str) -> Result<String, LoadError> {
    Err(LoadError::NotFound(path.to_string()))
}

#[test]
fn test_builder_api_exists() {
    let _builder = GemBuilder::default();
}

#[test]
fn test_compile_simple_document() {
    let builder = GemBuilder::default();
    let result = builder.compile(
        r#"<window title="Demo"><div><rect/><circle/></div></window>"#,
        &no_includes,
    );
    let scene = result.expect("Should compile valid document");

    assert_eq!(scene.drawable().kind(), "window");
    assert_eq!(scene.iter().count(), 4);
}

#[test]
fn test_compile_error_keeps_source() {
    let source = "<window><button/></window>";
    let err = GemBuilder::default()
        .compile(source, &no_includes)
        .expect_err("unknown tag should fail");

    match err {
        GemError::Compile { err, src } => {
            assert_eq!(src, source);
            assert!(!err.diagnostics().is_empty());
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn test_compile_file_loads_includes_next_to_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("theme.gms"), "rect { color: 3; }").unwrap();
    fs::write(dir.path().join("intro.md"), "# Welcome\nto *Gem*").unwrap();
    let document = dir.path().join("main.gem");
    fs::write(
        &document,
        r#"<window>
    <include as="style">theme.gms</include>
    <rect id="box"/>
    <include as="md" id="intro">intro.md</include>
</window>"#,
    )
    .unwrap();

    let scene = GemBuilder::default().compile_file(&document).unwrap();

    let rect = scene.find_by_id("box").unwrap();
    assert_eq!(rect.paint().foreground(), Some(Shade::Shade3));

    let intro = scene.find_by_id("intro").unwrap();
    let Drawable::Text { spans } = intro.drawable() else {
        panic!("expected text");
    };
    assert_eq!(
        spans[0],
        TextSpan::Heading {
            level: 1,
            text: "Welcome".into()
        }
    );
}

#[test]
fn test_configured_include_root() {
    let assets = tempfile::tempdir().unwrap();
    fs::write(assets.path().join("theme.gms"), "#box { width: 2; }").unwrap();

    let docs = tempfile::tempdir().unwrap();
    let document = docs.path().join("main.gem");
    fs::write(
        &document,
        r#"<window><include as="style">theme.gms</include><rect id="box"/></window>"#,
    )
    .unwrap();

    let config = AppConfig::new(
        CompilerConfig::default(),
        IncludeConfig::new(Some(assets.path().to_path_buf())),
    );
    let scene = GemBuilder::new(config).compile_file(&document).unwrap();
    let bounds = scene.find_by_id("box").unwrap().geometry().as_bounds().unwrap();
    assert_eq!(bounds.width(), 2.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let missing = PathBuf::from("definitely/not/here.gem");
    let err = GemBuilder::default().compile_file(&missing).unwrap_err();
    assert!(matches!(err, GemError::Io(_)));
}

#[test]
fn test_inline_markdown_config() {
    let source = "<window><text>a *b*</text></window>";
    let plain = GemBuilder::default().compile(source, &no_includes).unwrap();
    let rich = GemBuilder::new(AppConfig::new(
        CompilerConfig::new(true),
        IncludeConfig::default(),
    ))
    .compile(source, &no_includes)
    .unwrap();

    let spans = |scene: &gem::scene::SceneNode| match scene.children()[0].drawable() {
        Drawable::Text { spans } => spans.clone(),
        other => panic!("expected text, got {other:?}"),
    };
    assert_eq!(spans(&plain), vec![TextSpan::Plain("a *b*".into())]);
    assert_eq!(
        spans(&rich),
        vec![TextSpan::Plain("a ".into()), TextSpan::Italic("b".into())]
    );
}

#[test]
fn test_builder_reusability() {
    let builder = GemBuilder::default();
    let loader = FsLoader::new(".");

    let first = builder.compile("<window><rect/></window>", &loader).unwrap();
    let second = builder.compile("<window><circle/></window>", &loader).unwrap();

    assert_eq!(first.children()[0].drawable().kind(), "rect");
    assert_eq!(second.children()[0].drawable().kind(), "circle");
}

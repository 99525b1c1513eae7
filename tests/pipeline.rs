//! End-to-end catalog loading from a project sheet on disk.

use std::path::PathBuf;

use gj_portfolio::{load_catalog, CatalogSource, CatalogState, Credit, Error, FetchError};
use pretty_assertions::assert_eq;

fn write_sheet(dir: &tempfile::TempDir, contents: &str) -> CatalogSource {
    let path = dir.path().join("gj_projects.csv");
    std::fs::write(&path, contents).unwrap();
    CatalogSource::File(path)
}

#[tokio::test]
async fn babygirl_row_loads_with_one_credit_and_no_tags() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_sheet(
        &dir,
        "name,credits,year,media_path,visible,category,blurb,tags,media_aspect,link_feature,link\n\
         Babygirl,\"Artist,Greg Jobloves\";...,12/25/2024,BabyGirl.jpg,TRUE,VFX,\"Invisible VFX work\",,,FALSE,\n",
    );

    let catalog = load_catalog(&source).await.unwrap();

    assert_eq!(catalog.len(), 1);
    let project = &catalog.all()[0];
    assert_eq!(project.name, "Babygirl");
    assert_eq!(project.credits, vec![Credit::new("Artist", "Greg Jobloves")]);
    assert!(project.tags.is_empty());
    assert_eq!(project.year, "12/25/2024");
    assert_eq!(project.display_year(), "2024");
    assert_eq!(project.blurb, "Invisible VFX work");
    assert!(!project.link_feature);
    assert_eq!(project.shorthand, "");
}

#[tokio::test]
async fn visibility_requires_exact_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_sheet(
        &dir,
        "name,visible\nShown,TRUE\nLower,true\nPadded, TRUE\nBlank,\nNo,FALSE\nAlso Shown,TRUE\n",
    );

    let catalog = load_catalog(&source).await.unwrap();
    let names: Vec<_> = catalog.all().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Shown", "Also Shown"]);
}

#[tokio::test]
async fn malformed_rows_do_not_abort_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_sheet(
        &dir,
        "name,visible,category\n\
         First,TRUE,VFX\n\
         Broken,TRUE,VFX,unexpected\n\
         Second,TRUE,MoGraph\n\
         Dangling,TRUE,\"never closed\n",
    );

    let catalog = load_catalog(&source).await.unwrap();
    let names: Vec<_> = catalog.all().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[tokio::test]
async fn empty_sheet_is_an_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_sheet(&dir, "");
    let catalog = load_catalog(&source).await.unwrap();
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn missing_sheet_is_a_fetch_failure() {
    let source = CatalogSource::File(PathBuf::from("/definitely/not/here/gj_projects.csv"));

    let err = load_catalog(&source).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Read { .. })));

    let state = CatalogState::Unloaded.load(&source).await;
    assert!(state.projects().is_empty());
    let message = state.error().unwrap();
    assert!(message.starts_with("Failed to fetch project catalog"));
}

#[tokio::test]
async fn credits_and_tags_keep_source_order() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_sheet(
        &dir,
        "name,visible,credits,tags\n\
         Anamorphia II,TRUE,\"Lead,Greg;,Nobody;Supervisor,Someone\",\"vfx, roto ,paintout\"\n\
         Under the Lights,TRUE,,\n",
    );

    let catalog = load_catalog(&source).await.unwrap();
    let anamorphia = catalog.find_by_name("Anamorphia II").unwrap();
    assert_eq!(
        anamorphia.credits,
        vec![Credit::new("Lead", "Greg"), Credit::new("Supervisor", "Someone")]
    );
    assert_eq!(anamorphia.tags, vec!["vfx", "roto", "paintout"]);

    let lights = catalog.find_by_name("Under the Lights").unwrap();
    assert!(lights.credits.is_empty());
    assert!(lights.tags.is_empty());
}

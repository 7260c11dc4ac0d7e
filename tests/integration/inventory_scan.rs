use confdrift::extensions::AllowedExtensions;
use confdrift::inventory::scan;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use walkdir::WalkDir;

const FILES_MULTIPLIER: usize = 10;

/// Root plus one subdirectory, each holding allowed and swap files.
fn populated_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let sub = temp.path().join("objects");
    fs::create_dir_all(&sub).unwrap();

    for i in 0..FILES_MULTIPLIER {
        for dir in [temp.path(), sub.as_path()] {
            fs::write(dir.join(format!("test_file_{}.cfg", i)), ":octopus:").unwrap();
            fs::write(dir.join(format!("test_file_{}.cfg.swp", i)), ":octopus:").unwrap();
        }
    }
    temp
}

#[test]
fn inventory_counts_files_and_directories() {
    let temp = populated_tree();
    let inventory = scan(temp.path(), &AllowedExtensions::new([".cfg"])).unwrap();

    assert_eq!(inventory.files.len(), 2 * FILES_MULTIPLIER);
    assert_eq!(inventory.directories.len(), 2);
    assert!(inventory
        .files
        .iter()
        .all(|f| f.extension().and_then(|e| e.to_str()) == Some("cfg")));
}

#[test]
fn inventory_covers_every_entry_exactly_once_when_all_extensions_allowed() {
    let temp = populated_tree();
    let inventory = scan(temp.path(), &AllowedExtensions::new([".cfg", ".swp"])).unwrap();

    let expected: HashSet<PathBuf> = WalkDir::new(temp.path())
        .into_iter()
        .map(|e| e.unwrap().into_path())
        .collect();
    let found: Vec<PathBuf> = inventory
        .files
        .iter()
        .chain(inventory.directories.iter())
        .cloned()
        .collect();
    let unique: HashSet<PathBuf> = found.iter().cloned().collect();

    assert_eq!(found.len(), unique.len());
    assert_eq!(unique, expected);
}

#[test]
fn allow_list_keeps_only_matching_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.cfg"), "x=1").unwrap();
    fs::write(temp.path().join("b.txt"), "y=1").unwrap();
    fs::create_dir_all(temp.path().join("c.cfg.d")).unwrap();

    let inventory = scan(temp.path(), &AllowedExtensions::new([".cfg"])).unwrap();

    assert_eq!(inventory.files, vec![temp.path().join("a.cfg")]);
    let directories: HashSet<PathBuf> = inventory.directories.into_iter().collect();
    assert_eq!(
        directories,
        HashSet::from([temp.path().to_path_buf(), temp.path().join("c.cfg.d")])
    );
}

use super::*;
use collector::record::REPO_FIELDS;
use collector::ExportKind;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("github_export_{}", rand::random::<u64>()))
}

fn account(login: &str, followers: u32) -> Record {
    Record::default()
        .with("username", Field::value(login))
        .with("followers", Field::value(followers))
        .with("bio", Field::Missing)
}

fn batch(kind: ExportKind, records: Vec<Record>) -> ExportBatch {
    let mut batch = ExportBatch::new("alice", kind, records);
    batch.generated_at = 1700000000;
    batch
}

#[test]
fn escape_test() {
    assert_eq!(escape("plain text"), "plain text");
    assert_eq!(escape("two\tcells"), "\"two\tcells\"");
    assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
    assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
}

#[test]
fn write_creates_directory_and_drops_duplicates_test() {
    let dir = temp_dir().join("nested");
    let exporter = Exporter::new(&dir);
    let records = vec![account("bob", 3), account("carol", 1), account("bob", 3), account("bob", 4)];

    let path = exporter.write(&batch(ExportKind::Following, records)).unwrap();

    assert_eq!(path, dir.join("1700000000_alice-following.csv"));
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("username\turl\tbio\t"));
    assert_eq!(lines[1], "bob\t3\tNA");
    assert_eq!(lines[2], "carol\t1\tNA");
    assert_eq!(lines[3], "bob\t4\tNA");
    fs::remove_dir_all(dir.parent().unwrap()).unwrap();
}

#[test]
fn write_empty_batch_keeps_header_test() {
    let dir = temp_dir();
    let exporter = Exporter::new(&dir);

    let path = exporter.write(&batch(ExportKind::FollowingExtended, Vec::new())).unwrap();

    assert_eq!(path.file_name().unwrap(), "1700000000_alice-following_extended.csv");
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn append_complete_writes_header_once_test() {
    let dir = temp_dir();
    let exporter = Exporter::new(&dir);
    let repo = |name: &str| Record::default().with("User", Field::value("alice")).with("Name", Field::value(name));

    exporter.append_complete(&batch(ExportKind::Repos, vec![repo("tool")])).unwrap();
    let path = exporter.append_complete(&batch(ExportKind::Repos, vec![repo("lib")])).unwrap();

    assert_eq!(path, dir.join(COMPLETE_REPOS_FILE));
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec![REPO_FIELDS.join("\t").as_str(), "alice\ttool", "alice\tlib"]);
    fs::remove_dir_all(dir).unwrap();
}

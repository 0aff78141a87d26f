//! Integration tests for complete runs
//!
//! These tests run the pipeline against in-memory mirrors and check the
//! tables it writes as well as its fatal preconditions.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::TempDir;
use url::Url;

use distro_releases::app::listing::{
    normalize_mirror_root, ListingReader, ListingSource, ReleaseFetcher,
};
use distro_releases::app::{run, CrawlObserver, MirrorSpec, ReleaseRecord, RunConfig, TableSpec};
use distro_releases::errors::{
    AppError, DiscoveryError, DownloadError, DownloadResult, ListingError,
};

const DEBIAN: &str = "https://mirror.example/debian/";
const UBUNTU: &str = "https://mirror.example/ubuntu/";
const BACKUP: &str = "https://backup.example/debian/";

/// A set of mirrors held in memory
#[derive(Default)]
struct MemoryMirrors {
    listings: HashMap<String, &'static str>,
    files: HashMap<String, String>,
}

impl MemoryMirrors {
    fn listing(mut self, root: &str, listing: &'static str) -> Self {
        self.listings.insert(root.to_string(), listing);
        self
    }

    fn release(mut self, root: &str, dir: &str, body: &str) -> Self {
        self.files
            .insert(format!("{}{}/Release", root, dir), body.to_string());
        self
    }
}

#[async_trait]
impl ReleaseFetcher for MemoryMirrors {
    async fn fetch_release(&self, url: &Url) -> DownloadResult<String> {
        self.files
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| DownloadError::ServerError {
                status: 404,
                url: url.to_string(),
            })
    }
}

#[async_trait]
impl ListingSource for MemoryMirrors {
    async fn open_listing(&self, mirror_root: &Url) -> DownloadResult<ListingReader> {
        let root = normalize_mirror_root(mirror_root.clone());
        match self.listings.get(root.as_str()) {
            Some(&listing) => {
                let reader: ListingReader = Box::pin(listing.as_bytes());
                Ok(reader)
            }
            None => Err(DownloadError::ServerError {
                status: 404,
                url: format!("{}ls-lR.gz", root),
            }),
        }
    }
}

/// Counts observer callbacks
#[derive(Default)]
struct CountingObserver {
    events: std::sync::Mutex<Vec<String>>,
}

impl CrawlObserver for CountingObserver {
    fn mirror_started(&self, mirror: &MirrorSpec) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {}", mirror.name));
    }

    fn release_found(&self, _mirror: &MirrorSpec, _release: &ReleaseRecord) {
        self.events.lock().unwrap().push("release".to_string());
    }

    fn mirror_finished(&self, mirror: &MirrorSpec, releases: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("finish {} {}", mirror.name, releases));
    }
}

const DEBIAN_LISTING: &str = "\
./dists:
total 8
lrwxrwxrwx 1 ftp ftp    8 Jun 10  2023 stable -> bookworm

./dists/bookworm:
total 1544
-rw-r--r-- 1 ftp ftp 151244 Aug 31 10:11 InRelease
-rw-r--r-- 1 ftp ftp 150182 Aug 31 10:11 Release

./dists/bookworm-updates:
total 64
-rw-r--r-- 1 ftp ftp  16473 Oct 18 08:13 Release

./dists/experimental:
total 512
-rw-r--r-- 1 ftp ftp 185472 Oct 18 08:13 Release

./dists/sid:
total 512
-rw-r--r-- 1 ftp ftp 185472 Oct 18 08:13 Release
";

const UBUNTU_LISTING: &str = "\
./dists/bionic:
total 8
-rw-r--r-- 1 ftp ftp 1 Jun  1  2023 Release

./dists/jammy:
total 8
-rw-r--r-- 1 ftp ftp 1 Aug 11  2022 Release

./dists/lunar:
total 8
-rw-r--r-- 1 ftp ftp 1 Jan 25  2024 Release

./dists/mantic:
total 8
-rw-r--r-- 1 ftp ftp 1 Jul 11  2024 Release

./dists/noble:
total 8
-rw-r--r-- 1 ftp ftp 1 Apr 25  2024 Release

./dists/noble-updates:
total 8
-rw-r--r-- 1 ftp ftp 1 Oct 18 07:41 Release
";

const BACKUP_LISTING: &str = "\
./dists/sid:
total 512
-rw-r--r-- 1 ftp ftp 185472 Oct 18 08:13 Release
";

const EMPTY_LISTING: &str = "\
./dists/noble/main:
total 8
-rw-r--r-- 1 ftp ftp 1 Apr 25  2024 Release

./pool/main:
total 4
drwxr-xr-x 2 ftp ftp 4096 Apr 25  2024 a
";

fn ubuntu_release(codename: &str, suite: &str, version: &str) -> String {
    format!(
        "Origin: Ubuntu\nLabel: Ubuntu\nSuite: {}\nVersion: {}\nCodename: {}\nArchitectures: amd64 i386\n",
        suite, version, codename
    )
}

fn mirrors() -> MemoryMirrors {
    let sid = "Label: Debian\nSuite: unstable\nCodename: sid\nArchitectures: amd64 arm64 armel armhf i386\n";
    let mut mirrors = MemoryMirrors::default()
        .listing(DEBIAN, DEBIAN_LISTING)
        .listing(UBUNTU, UBUNTU_LISTING)
        .listing(BACKUP, BACKUP_LISTING)
        .release(
            DEBIAN,
            "dists/bookworm",
            "Label: Debian\nSuite: stable\nVersion: 12.7\nCodename: bookworm\nArchitectures: all amd64 arm64 armel armhf i386\n",
        )
        .release(
            DEBIAN,
            "dists/bookworm-updates",
            "Label: Debian\nSuite: stable-updates\nCodename: bookworm-updates\nArchitectures: amd64 arm64 i386\n",
        )
        .release(
            DEBIAN,
            "dists/experimental",
            "Label: Debian\nSuite: experimental\nCodename: rc-buggy\nArchitectures: amd64 arm64 i386\n",
        )
        .release(DEBIAN, "dists/sid", sid)
        .release(BACKUP, "dists/sid", sid);

    for (codename, suite, version) in [
        ("bionic", "bionic", "18.04"),
        ("jammy", "jammy", "22.04"),
        ("lunar", "lunar", "23.04"),
        ("mantic", "mantic", "23.10"),
        ("noble", "noble", "24.04"),
        ("noble", "noble-updates", "24.04"),
    ] {
        let dir = format!("dists/{}", suite);
        mirrors = mirrors.release(UBUNTU, &dir, &ubuntu_release(codename, suite, version));
    }
    mirrors
}

fn mirror(name: &str, url: &str) -> MirrorSpec {
    MirrorSpec {
        name: name.to_string(),
        url: Url::parse(url).unwrap(),
    }
}

fn tables() -> Vec<TableSpec> {
    vec![
        TableSpec {
            path: "x86.csv".into(),
            architectures: vec!["amd64".to_string(), "i386".to_string()],
        },
        TableSpec {
            path: "arm.csv".into(),
            architectures: vec![
                "arm64".to_string(),
                "armhf".to_string(),
                "armel".to_string(),
            ],
        },
    ]
}

fn run_config(output_dir: &Path, mirrors: Vec<MirrorSpec>, today: NaiveDate) -> RunConfig {
    RunConfig {
        mirrors,
        tables: tables(),
        output_dir: output_dir.to_path_buf(),
        today: Some(today),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn test_run_writes_all_tables() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("tables");
    let config = run_config(
        &output_dir,
        vec![
            mirror("debian", DEBIAN),
            mirror("ubuntu", UBUNTU),
            mirror("backup", BACKUP),
        ],
        date(2024, 6, 1),
    );

    let summary = run(&mirrors(), &config, &()).await.unwrap();

    let per_mirror: Vec<(&str, usize, usize)> = summary
        .mirrors
        .iter()
        .map(|m| (m.name.as_str(), m.releases, m.added))
        .collect();
    assert_eq!(
        per_mirror,
        vec![("debian", 4, 4), ("ubuntu", 6, 6), ("backup", 1, 0)]
    );
    assert_eq!(summary.merged, 10);
    assert_eq!(summary.relevant, 6);

    let rows: Vec<usize> = summary.tables.iter().map(|t| t.rows).collect();
    assert_eq!(rows, vec![12, 7]);

    let x86 = std::fs::read_to_string(output_dir.join("x86.csv")).unwrap();
    assert_eq!(
        x86,
        "OS,Dist,Arch,Name,Exp\n\
         debian,bookworm,amd64,\"Debian stable 12.7 (\"\"bookworm\"\")\",False\n\
         debian,bookworm,i386,\"Debian stable 12.7 (\"\"bookworm\"\")\",False\n\
         debian,sid,amd64,\"Debian unstable (\"\"sid\"\")\",False\n\
         debian,sid,i386,\"Debian unstable (\"\"sid\"\")\",False\n\
         debian,experimental,amd64,\"Debian experimental (\"\"rc-buggy\"\")\",True\n\
         debian,experimental,i386,\"Debian experimental (\"\"rc-buggy\"\")\",True\n\
         ubuntu,jammy,amd64,\"Ubuntu 22.04 LTS (\"\"jammy\"\")\",False\n\
         ubuntu,jammy,i386,\"Ubuntu 22.04 LTS (\"\"jammy\"\")\",False\n\
         ubuntu,mantic,amd64,\"Ubuntu 23.10 (\"\"mantic\"\")\",False\n\
         ubuntu,mantic,i386,\"Ubuntu 23.10 (\"\"mantic\"\")\",False\n\
         ubuntu,noble,amd64,\"Ubuntu 24.04 LTS (\"\"noble\"\")\",False\n\
         ubuntu,noble,i386,\"Ubuntu 24.04 LTS (\"\"noble\"\")\",False\n"
    );

    let arm = std::fs::read_to_string(output_dir.join("arm.csv")).unwrap();
    let arm_rows: Vec<&str> = arm
        .lines()
        .skip(1)
        .map(|line| line.split(',').take(3).last().unwrap())
        .collect();
    assert_eq!(
        arm_rows,
        vec!["arm64", "armhf", "armel", "arm64", "armhf", "armel", "arm64"]
    );
    assert!(arm.lines().last().unwrap().starts_with("debian,experimental,arm64,"));
}

#[tokio::test]
async fn test_observer_sees_every_mirror() {
    let temp_dir = TempDir::new().unwrap();
    let config = run_config(
        temp_dir.path(),
        vec![mirror("debian", DEBIAN), mirror("backup", BACKUP)],
        date(2024, 6, 1),
    );
    let observer = CountingObserver::default();

    run(&mirrors(), &config, &observer).await.unwrap();

    let events = observer.events.lock().unwrap().clone();
    assert_eq!(events.first().map(String::as_str), Some("start debian"));
    assert!(events.contains(&"finish debian 4".to_string()));
    assert_eq!(events.last().map(String::as_str), Some("finish backup 1"));
    assert_eq!(events.iter().filter(|e| *e == "release").count(), 5);
}

#[tokio::test]
async fn test_mirror_without_releases_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("tables");
    let source = mirrors().listing("https://empty.example/ubuntu/", EMPTY_LISTING);
    let config = run_config(
        &output_dir,
        vec![
            mirror("debian", DEBIAN),
            mirror("empty", "https://empty.example/ubuntu/"),
        ],
        date(2024, 6, 1),
    );

    let result = run(&source, &config, &()).await;
    match result {
        Err(AppError::Discovery(DiscoveryError::NoReleases { mirror })) => {
            assert_eq!(mirror, "empty");
        }
        other => panic!("expected NoReleases, got {:?}", other),
    }
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_unreachable_listing_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("tables");
    let config = run_config(
        &output_dir,
        vec![mirror("missing", "https://missing.example/debian")],
        date(2024, 6, 1),
    );

    let result = run(&mirrors(), &config, &()).await;
    match result {
        Err(AppError::Listing(ListingError::Open { mirror, .. })) => {
            assert_eq!(mirror, "missing");
        }
        other => panic!("expected a listing error, got {:?}", other),
    }
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_outdated_releases_leave_empty_tables() {
    let temp_dir = TempDir::new().unwrap();
    let source = MemoryMirrors::default()
        .listing(UBUNTU, UBUNTU_LISTING)
        .release(UBUNTU, "dists/noble", &ubuntu_release("noble", "noble", "24.04"));
    let config = run_config(
        temp_dir.path(),
        vec![mirror("ubuntu", UBUNTU)],
        date(2030, 1, 1),
    );

    let summary = run(&source, &config, &()).await.unwrap();
    assert_eq!(summary.merged, 1);
    assert_eq!(summary.relevant, 0);

    let x86 = std::fs::read_to_string(temp_dir.path().join("x86.csv")).unwrap();
    assert_eq!(x86, "OS,Dist,Arch,Name,Exp\n");
}

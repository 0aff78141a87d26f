//! Integration tests for listing crawls
//!
//! These tests drive the crawler over realistic mirror listings with an
//! in-memory metadata source and follow the discovered releases through to
//! the exported tables.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::StreamExt;
use url::Url;

use distro_releases::app::listing::{CrawlState, ListingCrawler, ReleaseFetcher};
use distro_releases::app::{collect_releases, export_rows, ReleaseRecord};
use distro_releases::errors::{DownloadError, DownloadResult};

const ROOT: &str = "https://mirror.example/debian/";

const DEBIAN_LISTING: &str = "\
./dists:
total 24
lrwxrwxrwx 1 ftp ftp    8 Jun 10  2023 stable -> bookworm
lrwxrwxrwx 1 ftp ftp    3 Jun 10  2023 unstable -> sid
drwxr-xr-x 4 ftp ftp 4096 Aug 31 10:11 bookworm

./dists/bookworm:
total 1544
-rw-r--r-- 1 ftp ftp 151244 Aug 31 10:11 InRelease
-rw-r--r-- 1 ftp ftp 150182 Aug 31 10:11 Release
-rw-r--r-- 1 ftp ftp   1055 Aug 31 10:11 Release.gpg
drwxr-xr-x 8 ftp ftp   4096 Aug 31 10:11 main

./dists/bookworm/main:
total 8
-rw-r--r-- 1 ftp ftp    112 Aug 31 10:11 Release

./dists/bookworm-updates:
total 64
-rw-r--r-- 1 ftp ftp  16473 Oct 18 08:13 Release

./dists/experimental:
total 512
lrwxrwxrwx 1 ftp ftp     19 Jun 10  2023 Release -> ../rc-buggy/Release

./dists/sid:
total 512
-rw-r--r-- 1 ftp ftp 185472 Oct 18 08:13 Release
";

/// Serves canned metadata files and records every request
#[derive(Default)]
struct MemoryMirror {
    files: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MemoryMirror {
    fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(format!("{}{}", ROOT, path), body.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseFetcher for MemoryMirror {
    async fn fetch_release(&self, url: &Url) -> DownloadResult<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.files
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| DownloadError::ServerError {
                status: 404,
                url: url.to_string(),
            })
    }
}

fn debian_mirror() -> MemoryMirror {
    MemoryMirror::default()
        .with(
            "dists/bookworm/Release",
            "Origin: Debian\n\
             Label: Debian\n\
             Suite: stable\n\
             Version: 12.7\n\
             Codename: bookworm\n\
             Date: Sat, 31 Aug 2024 10:11:23 UTC\n\
             Architectures: all amd64 arm64 armel armhf i386 mips64el ppc64el s390x\n\
             Components: main contrib non-free-firmware non-free\n\
             MD5Sum:\n \
             0ed6d4c8891eb86358b94bb35d9e4da4  1484322 contrib/Contents-all\n",
        )
        .with(
            "dists/bookworm-updates/Release",
            "Label: Debian\nSuite: stable-updates\nCodename: bookworm-updates\nArchitectures: amd64 i386\n",
        )
        .with(
            "dists/experimental/Release",
            "Label: Debian\nSuite: experimental\nCodename: rc-buggy\nArchitectures: amd64 arm64\n",
        )
        .with(
            "dists/sid/Release",
            "Label: Debian\nSuite: unstable\nCodename: sid\nArchitectures: amd64 arm64 i386\n",
        )
}

fn root() -> Url {
    Url::parse(ROOT).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn test_crawl_yields_every_release_directory() {
    let mirror = debian_mirror();
    let mut crawler = ListingCrawler::new(DEBIAN_LISTING.as_bytes(), root(), &mirror);

    let mut names = Vec::new();
    while let Some(release) = crawler.next_release().await {
        names.push(release.display_name().to_string());
    }

    assert_eq!(
        names,
        vec![
            "Debian stable 12.7 (\"bookworm\")",
            "Debian stable-updates (\"bookworm-updates\")",
            "Debian experimental (\"rc-buggy\")",
            "Debian unstable (\"sid\")",
        ]
    );
    assert_eq!(crawler.state(), CrawlState::Exhausted);

    let stats = crawler.stats();
    assert_eq!(stats.directory_blocks, 6);
    assert_eq!(stats.release_blocks, 4);
    assert_eq!(stats.candidates, 4);
    assert_eq!(stats.releases, 4);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(stats.success_rate(), 100.0);

    // The symlinked Release is fetched at its own directory
    assert!(mirror
        .requests()
        .contains(&format!("{}dists/experimental/Release", ROOT)));
}

#[tokio::test]
async fn test_non_release_directories_yield_nothing() {
    let listing = "\
./pool/main/h/hello:
total 8
-rw-r--r-- 1 ftp ftp 1000 Aug 31 10:11 Release

./dists/bookworm/main/binary-amd64:
total 8
-rw-r--r-- 1 ftp ftp  120 Aug 31 10:11 Release

./project/trace:
total 4
-rw-r--r-- 1 ftp ftp  300 Oct 18 08:13 master
";
    let mirror = debian_mirror();
    let crawler = ListingCrawler::new(listing.as_bytes(), root(), &mirror);

    let records: Vec<ReleaseRecord> = crawler.into_stream().collect().await;
    assert!(records.is_empty());
    assert!(mirror.requests().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_does_not_stop_crawl() {
    let mirror = MemoryMirror::default()
        .with(
            "dists/experimental/Release",
            "Label: Debian\nSuite: experimental\nCodename: rc-buggy\n",
        )
        .with(
            "dists/sid/Release",
            "Label: Debian\nSuite: unstable\nCodename: sid\n",
        );

    let mut crawler = ListingCrawler::new(DEBIAN_LISTING.as_bytes(), root(), &mirror);
    let catalog = {
        let mut names = Vec::new();
        while let Some(release) = crawler.next_release().await {
            names.push(release.codename().unwrap_or_default().to_string());
        }
        names
    };

    assert_eq!(catalog, vec!["rc-buggy", "sid"]);
    assert_eq!(crawler.stats().candidates, 4);
    assert_eq!(crawler.stats().fetch_failures, 2);
    assert_eq!(crawler.state(), CrawlState::Exhausted);
    assert_eq!(mirror.requests().len(), 4);
}

#[tokio::test]
async fn test_crawl_to_table() {
    let mirror = debian_mirror();
    let catalog =
        collect_releases(ListingCrawler::new(DEBIAN_LISTING.as_bytes(), root(), &mirror)).await;
    assert_eq!(catalog.len(), 4);

    let mut out = Vec::new();
    let rows = export_rows(catalog.sorted(), &mut out, &["amd64", "i386"], date(2024, 10, 18))
        .unwrap();
    assert_eq!(rows, 5);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "OS,Dist,Arch,Name,Exp\n\
         debian,bookworm,amd64,\"Debian stable 12.7 (\"\"bookworm\"\")\",False\n\
         debian,bookworm,i386,\"Debian stable 12.7 (\"\"bookworm\"\")\",False\n\
         debian,sid,amd64,\"Debian unstable (\"\"sid\"\")\",False\n\
         debian,sid,i386,\"Debian unstable (\"\"sid\"\")\",False\n\
         debian,experimental,amd64,\"Debian experimental (\"\"rc-buggy\"\")\",True\n"
    );
}

#[tokio::test]
async fn test_release_scenarios() {
    let listing = "\
./dists/bookworm:
total 8
-rw-r--r-- 1 ftp ftp 1 Aug 31 10:11 Release

./dists/experimental:
total 8
-rw-r--r-- 1 ftp ftp 1 Aug 31 10:11 Release

./dists/noble:
total 8
-rw-r--r-- 1 ftp ftp 1 Aug 31 10:11 Release
";
    let mirror = MemoryMirror::default()
        .with(
            "dists/bookworm/Release",
            "Label: Debian\nSuite: bookworm\nVersion: 12\nCodename: bookworm\nArchitectures: amd64 arm64\n",
        )
        .with(
            "dists/experimental/Release",
            "Label: Debian\nSuite: experimental\nCodename: rc-buggy\nArchitectures: amd64\n",
        )
        .with(
            "dists/noble/Release",
            "Label: Ubuntu\nSuite: noble\nVersion: 24.04\nCodename: noble\nArchitectures: amd64\n",
        );

    let catalog =
        collect_releases(ListingCrawler::new(listing.as_bytes(), root(), &mirror)).await;
    let records: Vec<&ReleaseRecord> = catalog.iter().collect();
    let today = date(2024, 10, 18);

    // Debian 12 exports a single amd64 row
    let bookworm = records[0];
    assert!(bookworm.is_relevant_on(today));
    let mut out = Vec::new();
    export_rows([bookworm], &mut out, &["amd64"], today).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "OS,Dist,Arch,Name,Exp\ndebian,bookworm,amd64,\"Debian 12 (\"\"bookworm\"\")\",False\n"
    );

    // Experimental is exported under its modern name
    let experimental = records[1];
    assert!(experimental.is_relevant_on(today));
    assert!(experimental.is_experimental_on(today));
    let mut out = Vec::new();
    export_rows([experimental], &mut out, &["amd64"], today).unwrap();
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("debian,experimental,amd64,"));

    // An LTS release stops being relevant five years after release
    let noble = records[2];
    assert!(noble.is_lts());
    assert!(noble.is_relevant_on(today));
    assert!(!noble.is_relevant_on(date(2029, 6, 1)));
}

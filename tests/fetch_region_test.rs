//! End-to-end region fetches against synthetic files on disk

mod common;

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tiffregion::decoder::{DecoderSettings, Region, RegionPolicy, TiffRegionDecoder};
use tiffregion::fetcher::{
    DecodeRequest, FetchErrorKind, FileResolver, ImageReference, RegionFetcher, ResourceResolver,
};
use tiffregion::io::seekable::SeekableReader;

use common::*;

fn fetcher() -> RegionFetcher {
    RegionFetcher::default()
}

fn fetcher_with(settings: DecoderSettings) -> RegionFetcher {
    RegionFetcher::new(Box::new(FileResolver::new()), Box::new(TiffRegionDecoder::new(settings)))
}

#[test]
fn region_inside_page_returns_all_pixels() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());

    for (page, (width, height)) in [(40u32, 30u32), (20, 15), (10, 8)].into_iter().enumerate() {
        let request = DecodeRequest::new(path.as_path(), Region::new(0, 0, width as i32, height as i32))
            .page(page);
        let pixels = fetcher().fetch(&request).unwrap();

        assert_eq!((pixels.width, pixels.height), (width, height));
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        assert_eq!(pixels.as_bytes(), expected_region(0, 0, width, height, 1, page as u32).as_slice());
    }

    let request = DecodeRequest::new(path.as_path(), Region::new(7, 4, 13, 9)).page(0);
    let pixels = fetcher().fetch(&request).unwrap();
    assert_eq!(pixels.len(), 13 * 9 * 4);
    assert_eq!(pixels.into_bytes(), expected_region(7, 4, 13, 9, 1, 0));
}

#[test]
fn sample_size_shrinks_by_ceiling_division() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());

    let mut previous = (u32::MAX, u32::MAX);
    for sample_size in 1..=8u32 {
        let request = DecodeRequest::new(path.as_path(), Region::new(3, 2, 35, 27)).sample_size(sample_size);
        let pixels = fetcher().fetch(&request).unwrap();

        assert_eq!(pixels.width, 35u32.div_ceil(sample_size));
        assert_eq!(pixels.height, 27u32.div_ceil(sample_size));
        assert!(pixels.width <= previous.0 && pixels.height <= previous.1);
        assert_eq!(pixels.as_bytes(), expected_region(3, 2, 35, 27, sample_size, 0).as_slice());
        previous = (pixels.width, pixels.height);
    }
}

#[test]
fn page_out_of_range_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());

    for page in [3usize, 4, 1000] {
        let request = DecodeRequest::new(path.as_path(), Region::new(0, 0, 5, 5)).page(page);
        let error = fetcher().fetch(&request).unwrap_err();
        assert_eq!(error.kind, FetchErrorKind::DecodeFailed);
        assert_eq!(error.code(), "getRegion-tiff-null");
        assert!(error.message.contains(&format!("page={}", page)));
    }
}

#[test]
fn missing_file_is_a_read_exception() {
    let dir = tempfile::tempdir().unwrap();
    let reference = ImageReference::from(dir.path().join("nope.tif").as_path());

    let error = fetcher().fetch(&DecodeRequest::new(reference.clone(), Region::new(0, 0, 1, 1))).unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::ResourceUnavailable);
    assert_eq!(error.code(), "getRegion-tiff-read-exception");
    assert!(error.message.contains(reference.as_str()));
    assert!(error.details.is_some());
}

/// Wraps handles so that open ones can be counted
struct Tracked {
    inner: Box<dyn SeekableReader>,
    open: Arc<AtomicUsize>,
}

impl Read for Tracked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for Tracked {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

struct CountingResolver {
    inner: FileResolver,
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

impl ResourceResolver for CountingResolver {
    fn open(&self, reference: &ImageReference) -> io::Result<Box<dyn SeekableReader>> {
        let inner = self.inner.open(reference)?;
        self.open.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Tracked { inner, open: Arc::clone(&self.open) }))
    }
}

#[test]
fn handles_are_released_on_every_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());
    let corrupt = write_file(dir.path(), "corrupt.tif", &{
        let mut bytes = TiffWriter::classic().write(&[pattern_page(8, 8, 0).codec(Codec::Deflate)]);
        bytes[20] ^= 0xFF;
        bytes
    });

    let open = Arc::new(AtomicUsize::new(0));
    let opened = Arc::new(AtomicUsize::new(0));
    let resolver = CountingResolver { inner: FileResolver::new(), open: Arc::clone(&open), opened: Arc::clone(&opened) };
    let fetcher = RegionFetcher::new(Box::new(resolver), Box::new(TiffRegionDecoder::default()));

    for _ in 0..50 {
        let missing = DecodeRequest::new(dir.path().join("missing.tif").as_path(), Region::new(0, 0, 1, 1));
        assert!(fetcher.fetch(&missing).is_err());
        let past_end = DecodeRequest::new(path.as_path(), Region::new(0, 0, 1, 1)).page(9);
        assert!(fetcher.fetch(&past_end).is_err());
        let good = DecodeRequest::new(path.as_path(), Region::new(0, 0, 4, 4));
        assert!(fetcher.fetch(&good).is_ok());
        let broken = DecodeRequest::new(corrupt.as_path(), Region::new(0, 0, 8, 8));
        assert!(fetcher.fetch(&broken).is_err());
    }

    assert_eq!(opened.load(Ordering::SeqCst), 150);
    assert_eq!(open.load(Ordering::SeqCst), 0);
}

#[test]
fn concurrent_fetches_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<_> = (0..4u32)
        .map(|i| {
            let pages = [pattern_page(24 + i, 18, 0), pattern_page(16, 12 + i, 1)];
            write_file(dir.path(), &format!("file-{}.tif", i), &TiffWriter::classic().write(&pages))
        })
        .collect();
    let fetcher = fetcher();

    std::thread::scope(|scope| {
        for (i, path) in files.iter().enumerate() {
            for page in 0..2u32 {
                let fetcher = &fetcher;
                scope.spawn(move || {
                    for round in 0..10u32 {
                        let left = (i as u32 + round) % 5;
                        let sample_size = 1 + round % 3;
                        let request = DecodeRequest::new(path.as_path(), Region::new(left as i32, 1, 9, 7))
                            .page(page as usize)
                            .sample_size(sample_size);
                        let pixels = fetcher.fetch(&request).unwrap();
                        assert_eq!(pixels.into_bytes(), expected_region(left, 1, 9, 7, sample_size, page));
                    }
                });
            }
        }
    });
}

#[test]
fn straddling_region_is_clipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());

    let request = DecodeRequest::new(path.as_path(), Region::new(30, -5, 20, 15));
    let pixels = fetcher().fetch(&request).unwrap();
    assert_eq!((pixels.width, pixels.height), (10, 10));
    assert_eq!(pixels.into_bytes(), expected_region(30, 0, 10, 10, 1, 0));

    let outside = DecodeRequest::new(path.as_path(), Region::new(100, 100, 5, 5));
    assert_eq!(fetcher().fetch(&outside).unwrap_err().kind, FetchErrorKind::DecodeFailed);
}

#[test]
fn straddling_region_is_refused_under_reject_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());
    let strict = fetcher_with(DecoderSettings { region_policy: RegionPolicy::Reject, ..DecoderSettings::default() });

    let straddling = DecodeRequest::new(path.as_path(), Region::new(30, 20, 20, 15));
    assert_eq!(strict.fetch(&straddling).unwrap_err().kind, FetchErrorKind::DecodeFailed);

    let inside = DecodeRequest::new(path.as_path(), Region::new(0, 0, 40, 30));
    assert_eq!(strict.fetch(&inside).unwrap().len(), 40 * 30 * 4);
}

#[test]
fn degenerate_requests_fail_to_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());

    for region in [Region::new(0, 0, 0, 5), Region::new(0, 0, 5, -1)] {
        let error = fetcher().fetch(&DecodeRequest::new(path.as_path(), region)).unwrap_err();
        assert_eq!(error.kind, FetchErrorKind::DecodeFailed);
    }

    let zero_sample = DecodeRequest::new(path.as_path(), Region::new(0, 0, 5, 5)).sample_size(0);
    assert_eq!(fetcher().fetch(&zero_sample).unwrap_err().kind, FetchErrorKind::DecodeFailed);
}

#[test]
fn output_limit_is_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());
    let small = fetcher_with(DecoderSettings { max_output_pixels: 100, ..DecoderSettings::default() });

    let large = DecodeRequest::new(path.as_path(), Region::new(0, 0, 40, 30));
    assert_eq!(small.fetch(&large).unwrap_err().kind, FetchErrorKind::DecodeFailed);

    let sampled = DecodeRequest::new(path.as_path(), Region::new(0, 0, 40, 30)).sample_size(4);
    assert_eq!(small.fetch(&sampled).unwrap().len(), 10 * 8 * 4);
}

#[test]
fn file_uri_references() {
    let dir = tempfile::tempdir().unwrap();
    let path = three_page_file(dir.path());
    let uri = url::Url::from_file_path(&path).unwrap();

    let request = DecodeRequest::new(uri.as_str(), Region::new(0, 0, 10, 8)).page(2);
    assert_eq!(fetcher().fetch(&request).unwrap().into_bytes(), expected_region(0, 0, 10, 8, 1, 2));
}

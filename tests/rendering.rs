use image::DynamicImage;
use sha2::{Digest, Sha256};
use superhero_pdf::builder::ReportBuilder;
use superhero_pdf::elements::{ImageLoadError, ImageResolver};
use superhero_pdf::grouping::GroupedRecords;
use superhero_pdf::model::HeroRecord;

/// Resolver for runs without network access; every hero is drawn without a picture.
struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _reference: &str) -> Result<DynamicImage, ImageLoadError> {
        Err(ImageLoadError::EmptyReference)
    }
}

fn sample_groups() -> GroupedRecords {
    GroupedRecords::from_records(vec![
        HeroRecord::new(69, "Terry McGinnis")
            .with_occupation(["Vigilante"])
            .with_aliases(["Batman", "Tiny Bat"])
            .with_place_of_birth("Gotham City, 2039"),
        HeroRecord::new(70, "Bruce Wayne")
            .with_occupation(["Businessman"])
            .with_alter_egos(["Batman"])
            .with_place_of_birth("Crest Hill, Bristol Township; Gotham County"),
        HeroRecord::new(71, "Dick Grayson")
            .with_occupation(["Vigilante"])
            .with_aliases(["Robin", "Nightwing"]),
    ])
}

fn render_sample_pdf() -> Vec<u8> {
    ReportBuilder::new("sample")
        .with_image_resolver(NoImages)
        .render(&sample_groups())
        .expect("render sample pdf")
        .bytes
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let bytes = render_sample_pdf();
    assert!(bytes.starts_with(b"%PDF"), "rendered PDF should start with a header");
}

#[test]
fn writes_report_to_output_dir() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (path, summary) = ReportBuilder::new("super_heroes")
        .with_output_dir(dir.path())
        .with_image_resolver(NoImages)
        .write(&sample_groups())
        .expect("write report");

    assert_eq!(path, dir.path().join("super_heroes.pdf"));
    assert_eq!(summary.heroes, 3);
    assert_eq!(summary.pages, 1);
    let written = std::fs::read(&path).expect("read report");
    assert!(written.starts_with(b"%PDF"));
}

#[test]
fn rendering_is_deterministic() {
    let bytes_a = render_sample_pdf();
    let bytes_b = render_sample_pdf();

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");

    let hash_a = normalized_hash(&bytes_a);
    let hash_b = normalized_hash(&bytes_b);

    assert_eq!(
        hash_a, hash_b,
        "PDF renders must be deterministic after metadata normalization"
    );
}

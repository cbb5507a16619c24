use ampalign_core::io::{BlastParser, FastaParser};
use ampalign_core::tools::ToolResult;
use ampalign_core::{
    reverse_complement, AmpliconCoordinate, AmpliconLocator, IsPcrError, LocatorParams,
    Orientation, OrientationSelector, PrimerSearch, ScoringScheme, SequenceHit,
    SubsequenceExtractor,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INSERT: &str = "GATTACAGGCTTAACCGTAGCTAGGCTAACGTTAGC";

/// Replays BLAST tabular output stored next to each assembly as `<assembly>.hits`.
struct TabularFileSearch;

impl PrimerSearch for TabularFileSearch {
    fn search(&self, _primers: &Path, assembly: &Path) -> ToolResult<Vec<SequenceHit>> {
        let hits_path = PathBuf::from(format!("{}.hits", assembly.display()));
        Ok(BlastParser::parse_file(hits_path)?)
    }

    fn name(&self) -> &'static str {
        "tabular-file"
    }
}

/// Slices the named contig out of a FASTA assembly.
struct FastaSliceExtractor;

impl SubsequenceExtractor for FastaSliceExtractor {
    fn extract(&self, assembly: &Path, coord: &AmpliconCoordinate) -> ToolResult<Vec<u8>> {
        let record = FastaParser::parse_file(assembly)?
            .into_iter()
            .find(|r| r.id == coord.contig_id)
            .expect("contig present in test assembly");
        Ok(record.seq[coord.start as usize..coord.end as usize].to_vec())
    }

    fn name(&self) -> &'static str {
        "fasta-slice"
    }
}

fn write_assembly(dir: &TempDir, name: &str, contig: &str, seq: &str, hits: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, format!(">{}\n{}\n", contig, seq)).unwrap();
    std::fs::write(format!("{}.hits", path.display()), hits.join("\n")).unwrap();
    path
}

#[test]
fn amplicons_in_opposite_orientations_align_end_to_end() {
    let dir = TempDir::new().unwrap();
    let primers = dir.path().join("primers.fa");
    std::fs::write(&primers, ">fwd\nACGTACGTAC\n>rev\nTTGGCCAATT\n").unwrap();

    // Assembly 1: 10 bp flank, forward primer at 11..20, insert, reverse primer site, flank
    let asm1_seq = format!("CCCCCCCCCCACGTACGTAC{}AATTGGCCAACCCCCCCCCC", INSERT);
    let rev_start = 20 + INSERT.len() as u64 + 1;
    let fwd_hit = "fwd\tctg1\t100.000\t10\t0\t0\t1\t10\t11\t20\t1e-3\t20.1\t10".to_string();
    let rev_hit = format!(
        "rev\tctg1\t100.000\t10\t0\t0\t1\t10\t{}\t{}\t1e-3\t20.1\t10",
        rev_start + 9,
        rev_start
    );
    let asm1 = write_assembly(&dir, "asm1.fa", "ctg1", &asm1_seq, &[&fwd_hit, &rev_hit]);

    // Assembly 2 carries the same insert on the opposite strand, with one substitution
    let mut insert_b = INSERT.as_bytes().to_vec();
    insert_b[5] = b'T';
    let insert_b_rc = String::from_utf8(reverse_complement(&insert_b).unwrap()).unwrap();
    let asm2_seq = format!("GGGGGGGGGGGGGGG{}GGGGGGGGGGGGGGG", insert_b_rc);
    let end2 = 15 + insert_b_rc.len() as u64;
    let fwd_hit2 = "fwd\tctg2\t100.000\t10\t0\t0\t1\t10\t6\t15\t1e-3\t20.1\t10".to_string();
    let rev_hit2 = format!(
        "rev\tctg2\t100.000\t10\t0\t0\t1\t10\t{}\t{}\t1e-3\t20.1\t10",
        end2 + 10,
        end2 + 1
    );
    let asm2 = write_assembly(&dir, "asm2.fa", "ctg2", &asm2_seq, &[&rev_hit2, &fwd_hit2]);

    let search = TabularFileSearch;
    let extractor = FastaSliceExtractor;
    let locator = AmpliconLocator::new(&search, &extractor, LocatorParams::new(500));

    let a = locator.locate(&primers, &asm1).unwrap();
    let b = locator.locate(&primers, &asm2).unwrap();

    // The half-open range ends on the first base of the reverse primer site
    assert_eq!(a.sequence.len(), INSERT.len() + 1);
    assert_eq!(&a.sequence[..INSERT.len()], INSERT.as_bytes());
    assert_eq!(b.sequence.len(), INSERT.len() + 1);
    assert_eq!(&b.sequence[..INSERT.len()], insert_b_rc.as_bytes());

    let selector = OrientationSelector::new(ScoringScheme::new(1, -1, -1));
    let oriented = selector
        .select(&a.sequence[..INSERT.len()], &b.sequence[..INSERT.len()])
        .unwrap();

    assert_eq!(oriented.orientation, Orientation::ReverseB);
    assert_eq!(oriented.alignment.score, INSERT.len() as i32 - 2);
    assert_eq!(oriented.alignment.stats().mismatches, 1);
}

#[test]
fn missing_amplicon_names_the_assembly() {
    let dir = TempDir::new().unwrap();
    let primers = dir.path().join("primers.fa");
    std::fs::write(&primers, ">fwd\nACGTACGTAC\n").unwrap();

    let only_forward = "fwd\tctg1\t100.000\t10\t0\t0\t1\t10\t11\t20\t1e-3\t20.1\t10";
    let asm = write_assembly(&dir, "lonely.fa", "ctg1", "ACGT", &[only_forward]);

    let search = TabularFileSearch;
    let extractor = FastaSliceExtractor;
    let locator = AmpliconLocator::new(&search, &extractor, LocatorParams::new(500));

    match locator.locate(&primers, &asm) {
        Err(IsPcrError::NoAmpliconFound { assembly }) => assert_eq!(assembly, asm),
        other => panic!("expected NoAmpliconFound, got {:?}", other),
    }
}

#[test]
fn amplicons_at_the_size_limit_are_rejected() {
    let dir = TempDir::new().unwrap();
    let primers = dir.path().join("primers.fa");
    std::fs::write(&primers, ">fwd\nACGTACGTAC\n>rev\nTTGGCCAATT\n").unwrap();

    // amplicon length = 60 - 20 = 40
    let hits = [
        "fwd\tctg1\t100.000\t10\t0\t0\t1\t10\t11\t20\t1e-3\t20.1\t10",
        "rev\tctg1\t100.000\t10\t0\t0\t1\t10\t69\t60\t1e-3\t20.1\t10",
    ];
    let asm = write_assembly(&dir, "asm.fa", "ctg1", &"A".repeat(80), &hits);

    let search = TabularFileSearch;
    let extractor = FastaSliceExtractor;

    let at_limit = AmpliconLocator::new(&search, &extractor, LocatorParams::new(40));
    assert!(matches!(
        at_limit.locate(&primers, &asm),
        Err(IsPcrError::NoAmpliconFound { .. })
    ));

    let above_limit = AmpliconLocator::new(&search, &extractor, LocatorParams::new(41));
    assert_eq!(above_limit.locate(&primers, &asm).unwrap().sequence.len(), 40);
}

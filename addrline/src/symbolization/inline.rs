//! Detection of addresses inside inlined function bodies

use super::debug_info::{DebugInfo, EntryTag};
use crate::domain::SymbolizeError;
use log::debug;
use std::ops::ControlFlow;

/// Whether `pc` falls inside an inlined subroutine of its compile unit
///
/// Only entries with exactly one contiguous range are considered. Inlined
/// expansions split over several ranges are not matched.
///
/// # Errors
/// Returns [`SymbolizeError::SeekFailed`] if no compile unit covers `pc`
pub fn detect_inline<D>(debug_info: &D, pc: u64) -> Result<bool, SymbolizeError>
where
    D: DebugInfo + ?Sized,
{
    let mut inline = false;

    debug_info.walk_unit(pc, &mut |entry| {
        // Entries never span compile units
        if entry.tag == EntryTag::CompileUnit {
            return ControlFlow::Break(());
        }

        match entry.single_range() {
            Some(range) if entry.tag == EntryTag::InlinedSubroutine && range.contains(&pc) => {
                debug!("0x{pc:x} is inside inlined range 0x{:x}-0x{:x}", range.start, range.end);
                inline = true;
                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        }
    })?;

    Ok(inline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::symbolization::debug_info::fake::{entry, FakeDebugInfo};
    use crate::symbolization::debug_info::DebugEntry;

    fn unit(entries: Vec<DebugEntry>) -> FakeDebugInfo {
        FakeDebugInfo::single_unit(0x1000..0x2000, entries, Vec::new())
    }

    #[test]
    fn test_inside_inlined_range() {
        let info = unit(vec![
            entry(EntryTag::Subprogram, &[0x1000..0x1100]),
            entry(EntryTag::InlinedSubroutine, &[0x1020..0x1040]),
        ]);
        assert!(detect_inline(&info, 0x1020).unwrap());
        assert!(detect_inline(&info, 0x1030).unwrap());
    }

    #[test]
    fn test_outside_inlined_range() {
        let info = unit(vec![
            entry(EntryTag::Subprogram, &[0x1000..0x1100]),
            entry(EntryTag::InlinedSubroutine, &[0x1020..0x1040]),
        ]);
        assert!(!detect_inline(&info, 0x101f).unwrap());
        // Range end is exclusive
        assert!(!detect_inline(&info, 0x1040).unwrap());
    }

    #[test]
    fn test_whole_inlined_range_reported() {
        let info = unit(vec![entry(EntryTag::InlinedSubroutine, &[0x1200..0x1280])]);
        assert!((0x1200..0x1280).all(|pc| detect_inline(&info, pc).unwrap()));
    }

    #[test]
    fn test_non_inlined_tag_ignored() {
        let info = unit(vec![entry(EntryTag::Subprogram, &[0x1000..0x1100])]);
        assert!(!detect_inline(&info, 0x1010).unwrap());
    }

    #[test]
    fn test_split_inlined_range_ignored() {
        let info =
            unit(vec![entry(EntryTag::InlinedSubroutine, &[0x1000..0x1010, 0x1080..0x1090])]);
        assert!(!detect_inline(&info, 0x1004).unwrap());
        assert!(!detect_inline(&info, 0x1084).unwrap());
    }

    #[test]
    fn test_walk_stops_at_next_compile_unit() {
        let info = unit(vec![
            entry(EntryTag::Subprogram, &[0x1000..0x1100]),
            entry(EntryTag::CompileUnit, &[0x1000..0x2000]),
            entry(EntryTag::InlinedSubroutine, &[0x1020..0x1040]),
        ]);
        assert!(!detect_inline(&info, 0x1030).unwrap());
    }

    #[test]
    fn test_no_unit_for_address() {
        let err = detect_inline(&unit(Vec::new()), 0x4000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Seek);
    }
}

use super::classifier::{LineClass, classify};
use super::entry::{GroupedEntry, IdCounter};

/// Fold an ordered batch of raw lines into grouped entries.
///
/// Ids are drawn from `ids`, so a caller that keeps the counter between
/// batches gets ids that stay unique across the whole sequence. A batch that
/// begins with continuation lines opens a fallback entry, since there is no
/// earlier entry in the batch to attach them to.
pub fn group<S: AsRef<str>>(lines: &[S], ids: &mut IdCounter) -> Vec<GroupedEntry> {
    let mut entries: Vec<GroupedEntry> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        match classify(line) {
            LineClass::StructuredStart(fields) => {
                entries.push(GroupedEntry::new(ids.next_id(), line, Some(fields)));
            }
            LineClass::GenericStart => {
                entries.push(GroupedEntry::new(ids.next_id(), line, None));
            }
            LineClass::Continuation => match entries.last_mut() {
                Some(last) => last.sub_lines.push(line.to_string()),
                None => entries.push(GroupedEntry::new(ids.next_id(), line, None)),
            },
        }
    }

    entries
}

/// Group with a fresh counter starting at zero.
pub fn group_lines<S: AsRef<str>>(lines: &[S]) -> Vec<GroupedEntry> {
    group(lines, &mut IdCounter::new())
}

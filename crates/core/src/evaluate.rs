use crate::counter::CounterState;
use crate::template::{CounterWidth, Tag, Template, TemplatePart};
use chrono::{DateTime, Local};

/// Read-only view of one file in the batch, supplied by the caller.
pub trait FileView {
    /// Display name including the extension.
    fn name(&self) -> String;
    /// Name without the extension.
    fn stem(&self) -> String;
    /// Extension without the leading dot; empty when there is none.
    fn extension(&self) -> String;
    fn parent_name(&self) -> String;
    fn grandparent_name(&self) -> String;
    fn size(&self) -> u64;
    fn modified(&self) -> Option<DateTime<Local>>;
}

/// External tag lookup used by `$T(...)` placeholders. An absent
/// service or an absent tag both evaluate to the empty string.
pub trait MetadataService {
    fn lookup(&self, file: &dyn FileView, tag_id: &str) -> Option<String>;
}

/// Expands every template node for one file and concatenates the
/// results in source order. Pure except for the random-hex draw: the
/// counter is only read, never advanced.
pub fn evaluate(
    template: &Template,
    file: &dyn FileView,
    metadata: Option<&dyn MetadataService>,
    counter: &CounterState,
    now: DateTime<Local>,
) -> String {
    let mut result = String::new();
    for part in template.parts() {
        match part {
            TemplatePart::Literal(text) => result.push_str(text),
            TemplatePart::Tag(tag) => match tag {
                Tag::FullName(range) => push_range(&mut result, &file.name(), range),
                Tag::Stem(range) => push_range(&mut result, &file.stem(), range),
                Tag::Extension(range) => push_range(&mut result, &file.extension(), range),
                Tag::ParentDir(range) => push_range(&mut result, &file.parent_name(), range),
                Tag::GrandparentDir(range) => {
                    push_range(&mut result, &file.grandparent_name(), range)
                }
                Tag::Counter(width) => {
                    let width_override = match width {
                        CounterWidth::Profile => None,
                        CounterWidth::Auto => Some(0),
                        CounterWidth::Fixed(value) => Some(*value),
                    };
                    result.push_str(&counter.render(width_override));
                }
                Tag::RandomHex { uppercase, width } => {
                    let width = *width;
                    // width is at most 8, so the value fits in a u32.
                    let mask = u32::MAX >> (32 - 4 * width as u32);
                    let value = rand::random::<u32>() & mask;
                    if *uppercase {
                        result.push_str(&format!("{value:0width$X}"));
                    } else {
                        result.push_str(&format!("{value:0width$x}"));
                    }
                }
                Tag::DateTime(field) => {
                    let stamp = file.modified().unwrap_or(now);
                    result.push_str(&stamp.format(field.chrono_spec()).to_string());
                }
                Tag::MetaTag(tag_id) => {
                    if let Some(value) = metadata.and_then(|m| m.lookup(file, tag_id)) {
                        result.push_str(&value);
                    }
                }
            },
        }
    }
    result
}

fn push_range(result: &mut String, source: &str, range: &crate::template::Range) {
    if let Some(slice) = range.substr(source) {
        result.push_str(&slice);
    }
}

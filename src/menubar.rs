use std::io::Write;

use crossterm::{queue, style};

use crate::config::KeyBindings;

/// Key hints shown above the canvas.
pub fn menu_items(bindings: &KeyBindings) -> Vec<String> {
    vec![
        format!("[{}][{}] quit", bindings.quit, bindings.quit_alt),
        format!("[{}] save", bindings.save),
        format!("[{}] pause/resume", bindings.toggle_loop),
    ]
}

/// Part of a menu item: a `[key]` hint or the label text around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Key(&'a str),
    Label(&'a str),
}

/// Split `item` into key hints and labels. An unclosed `[` is label text.
pub(crate) fn segments(item: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = item;
    while !rest.is_empty() {
        let key = rest
            .find('[')
            .and_then(|open| rest[open..].find(']').map(|len| (open, open + len + 1)));
        match key {
            Some((open, close)) => {
                if open > 0 {
                    out.push(Segment::Label(&rest[..open]));
                }
                out.push(Segment::Key(&rest[open..close]));
                rest = &rest[close..];
            }
            None => {
                out.push(Segment::Label(rest));
                break;
            }
        }
    }
    out
}

/// Queue `item` with key hints bold and labels dim.
pub fn print_menu_item(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    for segment in segments(item) {
        let (attr, text) = match segment {
            Segment::Key(text) => (style::Attribute::Bold, text),
            Segment::Label(text) => (style::Attribute::Dim, text),
        };
        queue!(
            out,
            style::SetAttribute(attr),
            style::Print(text),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn items_follow_bindings() {
        let items = menu_items(&KeyBindings::default());
        assert_eq!(items[0], "[q][Esc] quit");
        assert_eq!(items[1], "[s] save");
        assert_eq!(items[2], "[Space] pause/resume");
    }

    #[test]
    fn splits_keys_from_labels() {
        assert_eq!(
            segments("[q][Esc] quit"),
            vec![Segment::Key("[q]"), Segment::Key("[Esc]"), Segment::Label(" quit")]
        );
        assert_eq!(
            segments("save [x"),
            vec![Segment::Label("save [x")]
        );
        assert!(segments("").is_empty());
    }

    #[test]
    fn prints_all_text_in_order() {
        let mut out = Vec::new();
        print_menu_item(&mut out, "[s] save [x").unwrap();
        let text = String::from_utf8(out).unwrap();
        let save = text.find("[s]").unwrap();
        let label = text.find(" save ").unwrap();
        let tail = text.find("[x").unwrap();
        assert!(save < label && label < tail);
    }
}

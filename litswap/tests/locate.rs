use std::fs;

use litswap::locator::core::{LineIndex, Position, locate_all, report};
use tempfile::tempdir;

#[test]
fn report_for_file_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("App.tsx");
    let src = "import React from 'react';\n\nexport default function App() {\n  return null;\n}\n";
    fs::write(&path, src).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let offset = text.find("return").unwrap();
    let mut out = Vec::new();
    report(&text, &[0, offset, text.len()], &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("0 -> line 1 col 1\n{offset} -> line 4 col 3\n{} -> line 6 col 1\n", text.len())
    );
}

#[test]
fn one_index_many_lookups() {
    let text = "a\nbb\nccc\n".repeat(100);
    let index = LineIndex::new(&text);
    assert_eq!(index.line_count(), 301);
    assert_eq!(index.locate(9 * 50 + 2), Ok(Position { line: 152, column: 1 }));

    let located = locate_all(&text, &[0, 2, 5]).unwrap();
    let positions: Vec<(usize, usize)> = located
        .iter()
        .map(|l| (l.position.line, l.position.column))
        .collect();
    assert_eq!(positions, vec![(1, 1), (2, 1), (3, 1)]);
}

//! Diff rendering for fixture comparison.

/// Render a text diff between expected and actual output.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let mut any_line = false;
    for (i, (e, a)) in expected.lines().zip(actual.lines()).enumerate() {
        if e != a {
            any_line = true;
            out.push_str(&format!("@@ line {} @@\n", i + 1));
            out.push_str(&format!("-{e}\n"));
            out.push_str(&format!("+{a}\n"));
        }
    }
    if !any_line {
        // Differ only in length or trailing content.
        out.push_str(&format!("-{expected}\n"));
        out.push_str(&format!("+{actual}\n"));
    }
    out
}

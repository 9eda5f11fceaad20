//! Prompt construction for AI-generated commit messages.

/// Maximum characters of diff text embedded in the prompt.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Conventional commit types the model may use, with their meaning.
pub const COMMIT_TYPES: [(&str, &str); 7] = [
    ("feat", "for a new feature"),
    ("fix", "for a bug fix"),
    ("refactor", "for code restructuring"),
    ("docs", "for documentation updates"),
    ("style", "for code style or formatting changes"),
    ("test", "for adding or updating tests"),
    ("chore", "for build, dependency, or config updates"),
];

/// Maximum length of the generated title line.
pub const MAX_TITLE_LENGTH: usize = 72;

/// Build the instruction prompt for a diff.
///
/// The diff is embedded exactly once. Diffs longer than [`MAX_DIFF_LENGTH`]
/// are cut on a char boundary and a note tells the model so.
pub fn build_commit_prompt(diff: &str) -> String {
    let (diff_text, truncated) = truncate_diff(diff, MAX_DIFF_LENGTH);

    let type_list: String = COMMIT_TYPES
        .iter()
        .map(|(name, meaning)| format!("{name}: {meaning}"))
        .collect::<Vec<_>>()
        .join("\n");

    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    format!(
        r#"You are an expert software engineer and technical writer.
Your task is to generate a clear, concise, and meaningful Git commit message based on the provided `git diff`.

Follow these strict rules:
1. Read the diff carefully and identify what was changed, added, removed, or refactored.
2. Summarize the purpose of the change, not just what was modified.
3. Use present tense (e.g., add, fix, update, remove) in the message.
4. Keep the first line (the commit title) under {MAX_TITLE_LENGTH} characters.
5. If there are multiple logical changes, summarize them in short, separate sentences in the commit body (one per line).
6. Do NOT include bullet points, asterisks, markdown formatting, or code blocks.
7. Do NOT include backticks or quotation marks around filenames.
8. If you detect bug fixes, improvements, or new features, label them appropriately in the title.
9. The message must follow this format exactly:

<type>: <short summary>

<optional longer description or multiple lines, one per logical change>

Where <type> can be one of:
{type_list}

Git diff:
{diff_text}{truncation_note}
"#
    )
}

/// Cut `diff` to at most `max_len` bytes without splitting a character.
///
/// Returns the kept text and whether anything was removed.
pub fn truncate_diff(diff: &str, max_len: usize) -> (&str, bool) {
    if diff.len() <= max_len {
        return (diff, false);
    }

    let mut end = max_len;
    while end > 0 && !diff.is_char_boundary(end) {
        end -= 1;
    }
    (&diff[..end], true)
}

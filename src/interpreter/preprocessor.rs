/// Prepares raw source text for tokenization.
///
/// Line comments, block comments and `#`-prefixed directive lines are
/// elided; every line break they spanned is preserved so downstream line
/// numbers keep matching the original source. No macro expansion or include
/// handling takes place. The output always ends in a newline.
///
/// # Parameters
/// - `code`: The raw source text.
///
/// # Returns
/// The preprocessed source.
///
/// # Example
/// ```
/// use cleat::interpreter::preprocessor::preprocess;
///
/// let source = "int a = 1; // trailing comment\nint b = 2;";
/// let clean = preprocess(source);
///
/// assert_eq!(clean, "int a = 1; \nint b = 2;\n");
/// ```
#[must_use]
pub fn preprocess(code: &str) -> String {
    let bytes = code.as_bytes();
    let mut output: Vec<u8> = Vec::with_capacity(code.len());
    let mut cursor = 0;

    while cursor < bytes.len() {
        // line comment
        if bytes[cursor..].starts_with(b"//") {
            while cursor < bytes.len() && bytes[cursor] != b'\n' {
                cursor += 1;
            }
        }
        // block comment
        else if bytes[cursor..].starts_with(b"/*") {
            cursor += 2;

            while cursor < bytes.len() && !bytes[cursor..].starts_with(b"*/") {
                if bytes[cursor] == b'\n' {
                    output.push(b'\n');
                }

                cursor += 1;
            }

            if cursor < bytes.len() {
                cursor += 2;
            }

            continue;
        }
        // preprocessor directive; consumed without expansion
        else if bytes[cursor] == b'#' {
            while cursor < bytes.len() && bytes[cursor] != b'\n' {
                cursor += 1;
            }
        }

        if cursor < bytes.len() {
            output.push(bytes[cursor]);
            cursor += 1;
        }
    }

    if output.last() != Some(&b'\n') {
        output.push(b'\n');
    }

    // Only ASCII markers are ever skipped, so the output stays valid UTF-8.
    String::from_utf8(output).unwrap_or_default()
}

//! Near-duplicate detection over normalized symbol bodies.
//!
//! Bodies are tokenized lazily, here and nowhere else. Identifiers become
//! positional placeholders (first distinct identifier → `ID0`, second →
//! `ID1`, …), numeric literals `NUM`, strings `STR`; comments and
//! whitespace are dropped and language keywords stay verbatim, so two
//! functions differing only in naming or literal values normalize to the
//! same sequence. Similarity is the Jaccard index over the multiset of
//! token 3-grams; candidate pairs at or above the threshold cluster by
//! transitive closure (union-find), so A~B and B~C land in one cluster
//! even if A~C falls just under. Only same-language symbols are compared.

use std::collections::HashMap;

use petgraph::unionfind::UnionFind;

use taproot_core::{DuplicateCluster, DuplicateConfig, Language, SymbolKind, SymbolTable};

pub fn detect_duplicates(table: &SymbolTable, config: &DuplicateConfig) -> Vec<DuplicateCluster> {
    let symbols = table.symbols();

    // (symbol index, 3-gram multiset) per eligible symbol.
    let mut prepared: Vec<(usize, HashMap<String, u32>)> = Vec::new();
    for (idx, symbol) in symbols.iter().enumerate() {
        if symbol.kind == SymbolKind::Class {
            continue;
        }
        let tokens = normalize_tokens(&symbol.body, symbol.language);
        if tokens.len() <= config.min_body_tokens {
            continue;
        }
        prepared.push((idx, trigrams(&tokens)));
    }

    let mut union: UnionFind<usize> = UnionFind::new(symbols.len());
    let mut pair_sims: Vec<(usize, usize, f64)> = Vec::new();

    for (a, (idx_a, grams_a)) in prepared.iter().enumerate() {
        for (idx_b, grams_b) in prepared.iter().skip(a + 1) {
            let (idx_a, idx_b) = (*idx_a, *idx_b);
            if symbols[idx_a].language != symbols[idx_b].language {
                continue;
            }
            // Multiset Jaccard is bounded by the size ratio; skip pairs
            // that cannot reach the threshold.
            let (small, large) = {
                let (ta, tb) = (total(grams_a), total(grams_b));
                (ta.min(tb), ta.max(tb))
            };
            if large == 0 || (small as f64) / (large as f64) < config.similarity_threshold {
                continue;
            }

            let similarity = jaccard(grams_a, grams_b);
            if similarity >= config.similarity_threshold {
                union.union(idx_a, idx_b);
                pair_sims.push((idx_a, idx_b, similarity));
            }
        }
    }

    // Group candidate-pair members by union-find root; the cluster score is
    // the strongest pair inside it.
    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut score: HashMap<usize, f64> = HashMap::new();
    for &(a, b, similarity) in &pair_sims {
        let root = union.find(a);
        for idx in [a, b] {
            let bucket = members.entry(root).or_default();
            if !bucket.contains(&idx) {
                bucket.push(idx);
            }
        }
        let entry = score.entry(root).or_insert(similarity);
        if similarity > *entry {
            *entry = similarity;
        }
    }

    let mut clusters: Vec<DuplicateCluster> = members
        .into_iter()
        .map(|(root, mut indices)| {
            indices.sort_by(|&a, &b| symbols[a].id.cmp(&symbols[b].id));
            DuplicateCluster {
                symbols: indices.into_iter().map(|i| symbols[i].id.clone()).collect(),
                similarity: score[&root],
            }
        })
        .collect();
    clusters.sort_by(|a, b| a.symbols.cmp(&b.symbols));
    clusters
}

fn total(grams: &HashMap<String, u32>) -> u32 {
    grams.values().sum()
}

fn trigrams(tokens: &[String]) -> HashMap<String, u32> {
    let mut grams = HashMap::new();
    for window in tokens.windows(3) {
        let key = window.join("\u{0}");
        *grams.entry(key).or_insert(0) += 1;
    }
    grams
}

/// Jaccard index over multisets: Σ min(count) / Σ max(count).
fn jaccard(a: &HashMap<String, u32>, b: &HashMap<String, u32>) -> f64 {
    let mut intersection = 0u64;
    let mut union = 0u64;
    for (key, &count_a) in a {
        let count_b = b.get(key).copied().unwrap_or(0);
        intersection += count_a.min(count_b) as u64;
        union += count_a.max(count_b) as u64;
    }
    for (key, &count_b) in b {
        if !a.contains_key(key) {
            union += count_b as u64;
        }
    }
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Normalized token sequence of one body. Exposed for the duplicate tests.
pub fn normalize_tokens(body: &str, language: Language) -> Vec<String> {
    let keywords = keywords(language);
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut tokens = Vec::new();

    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if is_comment_start(bytes, i, language) {
            i = skip_comment(bytes, i, language);
            continue;
        }

        if is_string_delimiter(c, language) {
            i = skip_string(bytes, i);
            tokens.push("STR".to_string());
            continue;
        }

        if c.is_ascii_digit() {
            while i < bytes.len() {
                let d = bytes[i] as char;
                if d.is_ascii_alphanumeric() || d == '.' || d == '_' {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push("NUM".to_string());
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < bytes.len() {
                let d = bytes[i] as char;
                if d.is_ascii_alphanumeric() || d == '_' {
                    i += 1;
                } else {
                    break;
                }
            }
            let word = &body[start..i];
            if keywords.contains(&word) {
                tokens.push(word.to_string());
            } else {
                let next = ids.len();
                let slot = *ids.entry(word).or_insert(next);
                tokens.push(format!("ID{slot}"));
            }
            continue;
        }

        // Punctuation and operators, one char at a time.
        tokens.push(c.to_string());
        i += 1;
    }

    tokens
}

fn is_comment_start(bytes: &[u8], i: usize, language: Language) -> bool {
    match language {
        Language::Python => bytes[i] == b'#',
        _ => {
            bytes[i] == b'/'
                && i + 1 < bytes.len()
                && (bytes[i + 1] == b'/' || bytes[i + 1] == b'*')
        }
    }
}

fn skip_comment(bytes: &[u8], i: usize, language: Language) -> usize {
    let line_comment = language == Language::Python || bytes[i + 1] == b'/';
    if line_comment {
        let mut j = i;
        while j < bytes.len() && bytes[j] != b'\n' {
            j += 1;
        }
        j
    } else {
        let mut j = i + 2;
        while j + 1 < bytes.len() {
            if bytes[j] == b'*' && bytes[j + 1] == b'/' {
                return j + 2;
            }
            j += 1;
        }
        bytes.len()
    }
}

fn is_string_delimiter(c: char, language: Language) -> bool {
    match language {
        Language::Go => c == '"' || c == '\'' || c == '`',
        Language::JavaScript | Language::TypeScript => c == '"' || c == '\'' || c == '`',
        _ => c == '"' || c == '\'',
    }
}

/// Skip a string literal, honoring backslash escapes and Python
/// triple-quoted strings.
fn skip_string(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let triple = quote != b'`'
        && i + 2 < bytes.len()
        && bytes[i + 1] == quote
        && bytes[i + 2] == quote;
    let mut j = if triple { i + 3 } else { i + 1 };

    while j < bytes.len() {
        if bytes[j] == b'\\' && quote != b'`' {
            j += 2;
            continue;
        }
        if bytes[j] == quote {
            if !triple {
                return j + 1;
            }
            if j + 2 < bytes.len() && bytes[j + 1] == quote && bytes[j + 2] == quote {
                return j + 3;
            }
        }
        j += 1;
    }
    bytes.len()
}

fn keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &[
            "def", "return", "if", "elif", "else", "for", "while", "in", "not", "and", "or",
            "is", "None", "True", "False", "class", "import", "from", "as", "with", "try",
            "except", "finally", "raise", "lambda", "pass", "break", "continue", "yield",
            "global", "nonlocal", "del", "assert", "async", "await", "self",
        ],
        Language::JavaScript | Language::TypeScript => &[
            "function", "return", "if", "else", "for", "while", "do", "switch", "case",
            "break", "continue", "new", "var", "let", "const", "class", "extends", "import",
            "from", "export", "default", "this", "typeof", "instanceof", "in", "of", "try",
            "catch", "finally", "throw", "delete", "void", "yield", "async", "await", "null",
            "true", "false", "undefined", "super", "static", "get", "set", "interface",
            "type", "enum", "implements", "public", "private", "protected", "readonly",
        ],
        Language::C | Language::Cpp => &[
            "if", "else", "for", "while", "do", "switch", "case", "break", "continue",
            "return", "struct", "class", "enum", "union", "typedef", "static", "const",
            "void", "int", "char", "float", "double", "long", "short", "unsigned", "signed",
            "sizeof", "new", "delete", "public", "private", "protected", "virtual",
            "override", "template", "typename", "namespace", "using", "this", "nullptr",
            "true", "false", "auto", "goto", "default", "extern", "inline",
        ],
        Language::Java => &[
            "public", "private", "protected", "static", "final", "void", "int", "long",
            "double", "float", "boolean", "char", "byte", "short", "class", "interface",
            "enum", "extends", "implements", "return", "if", "else", "for", "while", "do",
            "switch", "case", "break", "continue", "new", "this", "super", "try", "catch",
            "finally", "throw", "throws", "import", "package", "null", "true", "false",
            "abstract", "synchronized", "volatile", "transient", "instanceof", "var",
            "default",
        ],
        Language::Go => &[
            "func", "return", "if", "else", "for", "range", "switch", "case", "break",
            "continue", "var", "const", "type", "struct", "interface", "map", "chan", "go",
            "defer", "select", "package", "import", "nil", "true", "false", "make", "new",
            "len", "cap", "append", "copy", "fallthrough", "goto", "default",
        ],
    }
}

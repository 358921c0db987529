// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Placeholder text for fixtures.
//!
//! Sentence and paragraph lengths are nominal: each draw varies the requested
//! count by up to 40% either way (never below one), so seeded data does not
//! look machine-stamped.

use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum", "perspiciatis", "unde", "omnis", "iste", "natus",
    "error", "voluptatem", "accusantium", "doloremque", "laudantium", "totam", "rem", "aperiam",
    "eaque", "ipsa", "quae", "ab", "illo", "inventore", "veritatis", "quasi", "architecto",
    "beatae", "vitae", "dicta", "explicabo", "nemo", "ipsam", "quia", "voluptas", "aspernatur",
    "aut", "odit", "fugit", "consequuntur", "magni", "dolores", "eos", "ratione", "sequi",
    "nesciunt", "neque", "porro", "quisquam", "dolorem", "adipisci", "numquam", "eius", "modi",
    "tempora", "incidunt", "magnam", "quaerat", "minima", "nostrum", "exercitationem", "ullam",
    "corporis", "suscipit", "laboriosam", "aliquid", "autem", "vel", "eum", "iure", "quam",
    "nihil", "molestiae", "illum", "quo", "at", "vero", "accusamus", "iusto", "odio",
    "dignissimos", "ducimus", "blanditiis", "praesentium", "deleniti", "atque", "corrupti",
    "quos", "quas", "molestias", "excepturi", "occaecati", "cupiditate", "provident",
    "similique", "mollitia", "animi", "harum", "quidem", "rerum", "facilis", "expedita",
    "distinctio", "nam", "libero", "tempore", "cum", "soluta", "nobis", "eligendi", "optio",
    "cumque", "impedit", "minus", "quod", "maxime", "placeat", "facere", "possimus", "assumenda",
    "repellendus", "temporibus", "quibusdam", "officiis", "debitis", "necessitatibus", "saepe",
    "eveniet", "voluptates", "repudiandae", "recusandae", "itaque", "earum", "hic", "tenetur",
    "sapiente", "delectus", "reiciendis", "voluptatibus", "maiores", "alias", "perferendis",
    "doloribus", "asperiores", "repellat",
];

/// Words per sentence inside a paragraph.
const PARAGRAPH_SENTENCE_WORDS: usize = 6;

/// Scales `nominal` by a random 60-140%, rounding down, with a floor of one.
fn vary<R: Rng + ?Sized>(rng: &mut R, nominal: usize) -> usize {
    let percent = rng.gen_range(60..=140);
    (nominal * percent / 100).max(1)
}

pub fn word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("lorem")
}

/// A capitalised sentence of roughly `nominal_words` words ending in a period.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, nominal_words: usize) -> String {
    let count = vary(rng, nominal_words);
    let words: Vec<&str> = (0..count).map(|_| word(rng)).collect();

    let mut text = capitalise(&words.join(" "));
    text.push('.');
    text
}

/// Roughly `nominal_sentences` sentences joined by single spaces.
pub fn paragraph<R: Rng + ?Sized>(rng: &mut R, nominal_sentences: usize) -> String {
    let count = vary(rng, nominal_sentences);
    (0..count)
        .map(|_| sentence(rng, PARAGRAPH_SENTENCE_WORDS))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

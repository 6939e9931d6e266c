// Text preparation: tokenization and the derived structures strategies
// compare (shingles, term-frequency vectors).

pub mod tokenizer;

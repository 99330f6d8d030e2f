use rs_bayes_core::corpus::{evaluate, load_corpus, split_corpus, train_documents};
use rs_bayes_core::{NaiveBayesModel, WordTokenizer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Tokens are lower-cased words; punctuation never becomes a token.
    // Stop-words carry no signal and are dropped before counting.
    let tokenizer = WordTokenizer::new().with_stop_words(["a", "the", "for", "on", "to", "is", "it", "you"]);

    // One document per line: "category<TAB>text"
    let documents = load_corpus("./data/messages.tsv")?;

    // Keep a quarter of the corpus aside; the seed makes the split reproducible
    let (train, test) = split_corpus(documents, 0.25, 7)?;

    let mut model = NaiveBayesModel::new();
    let learned = train_documents(&mut model, &train, &tokenizer);
    println!("Trained {} documents ({} tokens, vocabulary of {})", train.len(), learned, model.vocabulary_size());

    // Priors are estimated per token, not per document
    for category in model.categories() {
        println!("P({}) = {:.3}", category, model.category_probability(category)?);
    }

    let evaluation = evaluate(&model, &test, &tokenizer)?;
    println!("Accuracy on {} held-out documents: {:.2}", evaluation.total, evaluation.accuracy());

    for text in ["Claim your cheap prize now", "See you at lunch tomorrow", "Slides for the meeting"] {
        let prediction = model.predict_text(text, &tokenizer)?;
        println!("\n\"{}\" -> {}", text, prediction.category);
        for (category, probability) in prediction.probabilities() {
            println!("  {:<10} {:.4}", category, probability);
        }
    }

    // Asking about a category that was never trained is an error, not a zero
    match model.word_probability("cheap", "newsletter") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("\n{}", e),
    }

    Ok(())
}

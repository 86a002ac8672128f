use docsearch::{
    process_queries_joined, DocumentId, DocumentStatus, ExecutionMode, RequestQueue, SearchServer,
};

fn main() -> anyhow::Result<()> {
    println!("=== docsearch Basic Usage Example ===\n");

    let server = SearchServer::new("and with")?;

    println!("Inserting documents...");
    let texts = [
        "white cat and yellow hat",
        "curly cat curly tail",
        "nasty dog with big eyes",
        "nasty pigeon john",
    ];
    for (id, text) in (1..).zip(texts) {
        server.add_document(id, text, DocumentStatus::Actual, &[1, 2])?;
    }
    println!("✓ Inserted {} documents\n", server.document_count());

    // Example 1: default status, sequential
    println!("--- Example 1: ACTUAL by default ---");
    for document in server.find_top_documents(ExecutionMode::Sequential, "curly nasty cat")? {
        println!("{}", document);
    }

    // Example 2: explicit status
    println!("\n--- Example 2: BANNED ---");
    for document in server.find_top_documents_with_status(
        ExecutionMode::Sequential,
        "curly nasty cat",
        DocumentStatus::Banned,
    )? {
        println!("{}", document);
    }

    // Example 3: custom predicate, parallel
    println!("\n--- Example 3: Even ids ---");
    let even = |id: DocumentId, _: DocumentStatus, _: i32| id % 2 == 0;
    for document in server.find_top_documents_by(ExecutionMode::Parallel, "curly nasty cat", even)? {
        println!("{}", document);
    }

    // Example 4: matching
    println!("\n--- Example 4: Match document 2 ---");
    let (words, status) = server.match_document(ExecutionMode::Parallel, "curly cat -john", 2)?;
    println!("words = {:?}, status = {:?}", words, status);

    // Example 5: word frequencies
    println!("\n--- Example 5: Word frequencies of document 2 ---");
    for (word, freq) in server.word_frequencies(2) {
        println!("\"{}\" - {}", word, freq);
    }

    // Example 6: request statistics
    println!("\n--- Example 6: Request queue ---");
    let mut queue = RequestQueue::new(&server);
    queue.add_find_request("empty request")?;
    queue.add_find_request("curly dog")?;
    println!("Requests without results: {}", queue.no_result_requests());

    // Example 7: batch queries
    println!("\n--- Example 7: Batch queries ---");
    let joined = process_queries_joined(&server, &["curly", "nasty -john"])?;
    for document in &joined {
        println!("{}", document);
    }

    // Example 8: removal
    println!("\n--- Example 8: Remove documents ---");
    server.remove_document(ExecutionMode::Parallel, 2);
    server.remove_document(ExecutionMode::Sequential, 4);
    let ids: Vec<_> = server.document_ids().collect();
    println!("Remaining ids: {:?}", ids);

    println!("\n=== Example Complete ===");

    Ok(())
}

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html::{LogErrorSink, Token, Tokenizer, tokenize};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(blocks: usize) -> String {
    let block = "<div class=box><span id=\"s\" data-k='v'>hello</span><img src=x/></div>";
    let mut input = String::with_capacity(blocks * block.len());
    for _ in 0..blocks {
        input.push_str(block);
    }
    input
}

fn make_text_heavy(bytes: usize) -> String {
    let mut input = String::with_capacity(bytes + 16);
    input.push_str("<p>");
    while input.len() < bytes {
        input.push_str("plain text without any markup, ");
    }
    input.push_str("</p>");
    input
}

fn drain_count(input: &str) -> usize {
    let mut tokenizer = Tokenizer::new(input);
    let mut sink = LogErrorSink;
    let mut count = 0usize;
    loop {
        let token = tokenizer.next(&mut sink);
        count += 1;
        if matches!(token, Token::EndOfFile) {
            return count;
        }
    }
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| black_box(drain_count(black_box(&input))));
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| black_box(drain_count(black_box(&input))));
    });
}

fn bench_tokenize_text_heavy(c: &mut Criterion) {
    let input = make_text_heavy(1 << 20);
    c.bench_function("bench_tokenize_text_heavy", |b| {
        b.iter(|| black_box(drain_count(black_box(&input))));
    });
}

fn bench_tokenize_collected(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_collected", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(&input));
            black_box(tokens.len());
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_tokenize_text_heavy,
    bench_tokenize_collected
);
criterion_main!(benches);

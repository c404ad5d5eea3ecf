use criterion::{criterion_group, criterion_main, Criterion};
use readnext_core::{Book, Library, Rating, SimilarityMatrix};

fn synthetic_library(n: usize) -> Library {
    let books: Vec<Book> = (0..n)
        .map(|i| Book {
            isbn: format!("{i:010}"),
            title: format!("Title {i}"),
            author: format!("Author {}", i % 97),
            image_url: format!("http://img/{i}.jpg"),
        })
        .collect();
    let ratings: Vec<Rating> = (0..n)
        .flat_map(|i| {
            (0..(i % 40) as u32).map(move |u| Rating {
                isbn: format!("{i:010}"),
                user_id: u,
                rating: 7,
            })
        })
        .collect();
    let titles: Vec<String> = (0..n).map(|i| format!("Title {i}")).collect();
    let rows: Vec<Vec<f32>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        1.0
                    } else {
                        ((i * 31 + j * 17) % 1000) as f32 / 1000.0
                    }
                })
                .collect()
        })
        .collect();
    Library::new(books, ratings, SimilarityMatrix::new(titles, rows))
}

fn bench_queries(c: &mut Criterion) {
    let library = synthetic_library(1000);
    c.bench_function("top_rated_151", |b| b.iter(|| library.top_rated(151)));
    c.bench_function("recommend_10", |b| b.iter(|| library.recommend("Title 500", 10)));
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);

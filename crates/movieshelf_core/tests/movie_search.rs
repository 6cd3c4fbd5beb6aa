use movieshelf_core::db::{open_db, open_db_in_memory};
use movieshelf_core::{
    Movie, MovieRepository, RepoError, SqliteMovieRepository, ValidationError,
    DEFAULT_SEARCH_LIMIT,
};

fn setup() -> SqliteMovieRepository {
    SqliteMovieRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

fn seed(repo: &SqliteMovieRepository) -> Vec<Movie> {
    let mut movies = vec![
        Movie::new("The Hobbit: An Unexpected Journey", "Fantasy", "169 min", "2012-12-14"),
        Movie::new("The Lord of the Rings", "Fantasy", "178 min", "2001-12-19"),
        Movie::new("The Hobbit: The Desolation of Smaug", "Fantasy", "161 min", "2013-12-13"),
        Movie::new("100% Wolf", "Animation", "96 min", "2020-06-26"),
        Movie::new("Up", "Animation", "96 min", "2009-05-29"),
    ];
    for movie in &mut movies {
        repo.create(movie).unwrap();
    }
    movies
}

fn titles(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|movie| movie.title.as_str()).collect()
}

#[test]
fn create_and_get_roundtrip_returns_full_record() {
    let repo = setup();

    let mut movie = Movie::new("Arrival", "Sci-Fi", "116 min", "2016-11-11");
    let id = repo.create(&mut movie).unwrap();

    assert_eq!(movie.id, Some(id));
    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, movie);
    assert_eq!(loaded.genre, "Sci-Fi");
    assert_eq!(loaded.length, "116 min");
}

#[test]
fn duplicate_title_is_constraint_violation() {
    let repo = setup();
    repo.create(&mut Movie::new("Up", "Animation", "96 min", "2009"))
        .unwrap();

    let err = repo
        .create(&mut Movie::new("Up", "Drama", "1 h", "2010"))
        .unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
}

#[test]
fn create_requires_title_and_release_date() {
    let repo = setup();

    let err = repo
        .create(&mut Movie::new(" ", "Drama", "90 min", "2001"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::EmptyTitle)));

    let err = repo
        .create(&mut Movie::new("Heat", "Crime", "170 min", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyReleaseDate)
    ));
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn delete_reports_whether_row_existed() {
    let repo = setup();
    let id = repo
        .create(&mut Movie::new("Heat", "Crime", "170 min", "1995-12-15"))
        .unwrap();

    assert!(repo.delete(id).unwrap());
    assert!(!repo.delete(id).unwrap());
    assert_eq!(repo.get_by_id(id).unwrap(), None);
}

#[test]
fn search_is_case_insensitive_substring() {
    let repo = setup();
    seed(&repo);

    let hits = repo.search_by_title("HOBBIT", 20, 0).unwrap();
    assert_eq!(
        titles(&hits),
        vec![
            "The Hobbit: An Unexpected Journey",
            "The Hobbit: The Desolation of Smaug"
        ]
    );

    let hits = repo.search_by_title("of the", 20, 0).unwrap();
    assert_eq!(titles(&hits), vec!["The Lord of the Rings"]);
}

#[test]
fn search_with_empty_query_returns_all_in_stable_order() {
    let repo = setup();
    let seeded = seed(&repo);

    let first = repo.search_by_title("", 20, 0).unwrap();
    let second = repo.search_by_title("", 20, 0).unwrap();

    assert_eq!(first, seeded);
    assert_eq!(first, second);
}

#[test]
fn search_applies_limit_and_offset() {
    let repo = setup();
    let seeded = seed(&repo);

    let page = repo.search_by_title("", 2, 1).unwrap();
    assert_eq!(page, seeded[1..3].to_vec());

    let past_end = repo.search_by_title("", 20, 50).unwrap();
    assert!(past_end.is_empty());
}

#[test]
fn search_without_matches_returns_empty_vec() {
    let repo = setup();
    seed(&repo);

    assert!(repo.search_by_title("zzz", 20, 0).unwrap().is_empty());
}

#[test]
fn search_treats_like_wildcards_literally() {
    let repo = setup();
    seed(&repo);

    let hits = repo.search_by_title("%", 20, 0).unwrap();
    assert_eq!(titles(&hits), vec!["100% Wolf"]);

    assert!(repo.search_by_title("_p", 20, 0).unwrap().is_empty());
}

#[test]
fn get_all_returns_first_default_page() {
    let repo = setup();
    for n in 0..25 {
        repo.create(&mut Movie::new(format!("Movie {n:02}"), "Drama", "90 min", "2000"))
            .unwrap();
    }

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), DEFAULT_SEARCH_LIMIT as usize);
    assert_eq!(all[0].title, "Movie 00");
}

#[test]
fn null_release_date_is_rejected_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.db");
    let repo = SqliteMovieRepository::try_new(open_db(&path).unwrap()).unwrap();

    open_db(&path)
        .unwrap()
        .execute(
            "INSERT INTO movies (title, length, genre, release_date)
             VALUES ('Unknown', '90 min', 'Drama', NULL);",
            [],
        )
        .unwrap();

    let err = repo.search_by_title("", 20, 0).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

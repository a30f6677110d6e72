use albummusician_core::db::open_db_in_memory;
use albummusician_core::{
    Album, AlbumMusicianError, AlbumMusicianService, BusinessErrorKind, CatalogRepository,
    Musician, MusicianDescriptor, NewAlbum, NewMusician, RepoResult, SqliteCatalogRepository,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::cell::Cell;
use std::rc::Rc;

const MISSING_ID: i64 = 9_999;

/// Delegating repository that counts `save_album` calls.
struct CountingRepo<'conn> {
    inner: SqliteCatalogRepository<'conn>,
    saves: Rc<Cell<usize>>,
}

impl CatalogRepository for CountingRepo<'_> {
    fn find_musician(&self, id: i64) -> RepoResult<Option<Musician>> {
        self.inner.find_musician(id)
    }

    fn find_album(&self, id: i64, include_performers: bool) -> RepoResult<Option<Album>> {
        self.inner.find_album(id, include_performers)
    }

    fn save_album(&mut self, album: &Album) -> RepoResult<Album> {
        self.saves.set(self.saves.get() + 1);
        self.inner.save_album(album)
    }
}

struct Fixture {
    conn: Connection,
    musicians: Vec<Musician>,
    album: Album,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Seeds three musicians and one album performed by the first two.
fn setup() -> Fixture {
    let mut conn = open_db_in_memory().unwrap();
    let (musicians, album) = {
        let mut repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
        let musicians: Vec<Musician> = ["John Coltrane", "Cannonball Adderley", "Paul Chambers"]
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut draft = NewMusician::new(*name, date(1926 + idx as i32, 9, 23));
                draft.image = format!("https://img.example/{idx}.png");
                draft.description = format!("member {idx}");
                repo.insert_musician(&draft).unwrap()
            })
            .collect();
        let mut album = repo
            .insert_album(&NewAlbum::new("Kind of Blue", date(1959, 8, 17)))
            .unwrap();
        album.performers = vec![musicians[0].clone(), musicians[1].clone()];
        let album = repo.save_album(&album).unwrap();
        (musicians, album)
    };
    Fixture {
        conn,
        musicians,
        album,
    }
}

fn service(conn: &mut Connection) -> AlbumMusicianService<SqliteCatalogRepository<'_>> {
    AlbumMusicianService::new(SqliteCatalogRepository::try_new(conn).unwrap())
}

fn counting_service(
    conn: &mut Connection,
) -> (AlbumMusicianService<CountingRepo<'_>>, Rc<Cell<usize>>) {
    let saves = Rc::new(Cell::new(0));
    let repo = CountingRepo {
        inner: SqliteCatalogRepository::try_new(conn).unwrap(),
        saves: Rc::clone(&saves),
    };
    (AlbumMusicianService::new(repo), saves)
}

fn ids(musicians: &[Musician]) -> Vec<i64> {
    musicians.iter().map(|m| m.id).collect()
}

#[test]
fn link_replaces_existing_performers_with_single_musician() {
    let mut fx = setup();
    let third = fx.musicians[2].clone();
    let mut service = service(&mut fx.conn);

    let linked = service.link_musician(third.id, fx.album.id).unwrap();
    assert_eq!(linked.performers, vec![third.clone()]);

    let listed = service.list_musicians(fx.album.id).unwrap();
    assert_eq!(ids(&listed), vec![third.id]);
}

#[test]
fn link_with_missing_records_is_not_found() {
    let mut fx = setup();
    let musician_id = fx.musicians[0].id;
    let (mut service, saves) = counting_service(&mut fx.conn);

    let err = service.link_musician(MISSING_ID, fx.album.id).unwrap_err();
    assert!(matches!(err, AlbumMusicianError::MusicianNotFound(MISSING_ID)));
    assert_eq!(err.kind(), Some(BusinessErrorKind::NotFound));

    let err = service.link_musician(musician_id, MISSING_ID).unwrap_err();
    assert!(matches!(err, AlbumMusicianError::AlbumNotFound(MISSING_ID)));
    assert_eq!(saves.get(), 0);
}

#[test]
fn missing_musician_checked_before_album() {
    let mut fx = setup();
    let service = service(&mut fx.conn);

    let err = service
        .get_linked_musician(MISSING_ID, MISSING_ID + 1)
        .unwrap_err();
    assert!(matches!(err, AlbumMusicianError::MusicianNotFound(MISSING_ID)));
}

#[test]
fn get_linked_musician_returns_member_or_precondition_failure() {
    let mut fx = setup();
    let member = fx.musicians[1].clone();
    let outsider = fx.musicians[2].id;
    let service = service(&mut fx.conn);

    let found = service.get_linked_musician(member.id, fx.album.id).unwrap();
    assert_eq!(found, member);

    let err = service
        .get_linked_musician(outsider, fx.album.id)
        .unwrap_err();
    assert!(matches!(
        err,
        AlbumMusicianError::MusicianNotAssociated { musician_id, album_id }
            if musician_id == outsider && album_id == fx.album.id
    ));
    assert_eq!(err.kind(), Some(BusinessErrorKind::PreconditionFailed));
}

#[test]
fn replace_uses_descriptor_values_not_stored_values() {
    let mut fx = setup();
    let descriptors: Vec<MusicianDescriptor> = fx
        .musicians
        .iter()
        .rev()
        .map(|m| MusicianDescriptor {
            name: format!("{} (remaster)", m.name),
            description: "from descriptor".to_string(),
            birth_date: date(2000, 1, 1),
            ..MusicianDescriptor::from(m)
        })
        .collect();
    let mut service = service(&mut fx.conn);

    let saved = service
        .replace_musicians(fx.album.id, &descriptors)
        .unwrap();
    let expected: Vec<Musician> = descriptors.iter().map(|d| d.to_snapshot()).collect();
    assert_eq!(saved.performers, expected);
    assert_eq!(service.list_musicians(fx.album.id).unwrap(), expected);
}

#[test]
fn replace_with_unknown_musician_leaves_album_unchanged() {
    let mut fx = setup();
    let before = ids(&fx.album.performers);
    let mut descriptors = vec![MusicianDescriptor::from(&fx.musicians[2])];
    descriptors.push(MusicianDescriptor {
        id: MISSING_ID,
        ..descriptors[0].clone()
    });
    let (mut service, saves) = counting_service(&mut fx.conn);

    let err = service
        .replace_musicians(fx.album.id, &descriptors)
        .unwrap_err();
    assert!(matches!(err, AlbumMusicianError::MusicianNotFound(MISSING_ID)));
    assert_eq!(saves.get(), 0);
    assert_eq!(ids(&service.list_musicians(fx.album.id).unwrap()), before);
}

#[test]
fn replace_on_missing_album_is_not_found() {
    let mut fx = setup();
    let descriptors = vec![MusicianDescriptor::from(&fx.musicians[0])];
    let mut service = service(&mut fx.conn);

    let err = service
        .replace_musicians(MISSING_ID, &descriptors)
        .unwrap_err();
    assert!(matches!(err, AlbumMusicianError::AlbumNotFound(MISSING_ID)));
}

#[test]
fn replace_collapses_repeated_ids_to_first_occurrence() {
    let mut fx = setup();
    let first = MusicianDescriptor::from(&fx.musicians[0]);
    let repeated = MusicianDescriptor {
        name: "ignored".to_string(),
        ..first.clone()
    };
    let other = MusicianDescriptor::from(&fx.musicians[2]);
    let mut service = service(&mut fx.conn);

    let saved = service
        .replace_musicians(fx.album.id, &[first.clone(), other.clone(), repeated])
        .unwrap();
    assert_eq!(saved.performers, vec![first.to_snapshot(), other.to_snapshot()]);
}

#[test]
fn replace_with_empty_list_clears_performers() {
    let mut fx = setup();
    let mut service = service(&mut fx.conn);

    let saved = service.replace_musicians(fx.album.id, &[]).unwrap();
    assert!(saved.performers.is_empty());
}

#[test]
fn list_on_missing_album_is_not_found() {
    let mut fx = setup();
    let service = service(&mut fx.conn);

    let err = service.list_musicians(MISSING_ID).unwrap_err();
    assert!(matches!(err, AlbumMusicianError::AlbumNotFound(MISSING_ID)));
}

#[test]
fn unlink_removes_only_target_and_keeps_order() {
    let mut fx = setup();
    let (a, b, c) = (
        fx.musicians[0].clone(),
        fx.musicians[1].clone(),
        fx.musicians[2].clone(),
    );
    let mut service = service(&mut fx.conn);
    let descriptors: Vec<MusicianDescriptor> =
        [&a, &b, &c].iter().map(|m| MusicianDescriptor::from(*m)).collect();
    service
        .replace_musicians(fx.album.id, &descriptors)
        .unwrap();

    let saved = service.unlink_musician(b.id, fx.album.id).unwrap();
    assert_eq!(ids(&saved.performers), vec![a.id, c.id]);
}

#[test]
fn unlink_non_member_is_silent_noop_and_repeatable() {
    let mut fx = setup();
    let member = fx.musicians[0].id;
    let outsider = fx.musicians[2].id;
    let before = fx.album.clone();
    let mut service = service(&mut fx.conn);

    let unchanged = service.unlink_musician(outsider, fx.album.id).unwrap();
    assert_eq!(unchanged, before);

    let first = service.unlink_musician(member, fx.album.id).unwrap();
    let second = service.unlink_musician(member, fx.album.id).unwrap();
    assert_eq!(first, second);
    assert!(!second.has_performer(member));
}

#[test]
fn unlink_with_missing_records_is_not_found_without_write() {
    let mut fx = setup();
    let member = fx.musicians[0].id;
    let (mut service, saves) = counting_service(&mut fx.conn);

    assert!(matches!(
        service.unlink_musician(MISSING_ID, fx.album.id).unwrap_err(),
        AlbumMusicianError::MusicianNotFound(MISSING_ID)
    ));
    assert!(matches!(
        service.unlink_musician(member, MISSING_ID).unwrap_err(),
        AlbumMusicianError::AlbumNotFound(MISSING_ID)
    ));
    assert_eq!(saves.get(), 0);
}

#[test]
fn documented_walkthrough_unlink_get_then_link() {
    let mut fx = setup();
    let (first, second, third) = (
        fx.musicians[0].id,
        fx.musicians[1].id,
        fx.musicians[2].id,
    );
    let album_id = fx.album.id;
    let mut service = service(&mut fx.conn);

    let after_unlink = service.unlink_musician(first, album_id).unwrap();
    assert_eq!(ids(&after_unlink.performers), vec![second]);

    let err = service.get_linked_musician(first, album_id).unwrap_err();
    assert_eq!(err.kind(), Some(BusinessErrorKind::PreconditionFailed));

    let after_link = service.link_musician(third, album_id).unwrap();
    assert_eq!(ids(&after_link.performers), vec![third]);
}

#[test]
fn descriptors_deserialize_from_camel_case_json() {
    let payload = r#"[{
        "id": 3,
        "name": "Jimmy Cobb",
        "image": "https://img.example/cobb.png",
        "description": "drums",
        "birthDate": "1929-01-20"
    }]"#;
    let descriptors: Vec<MusicianDescriptor> = serde_json::from_str(payload).unwrap();
    assert_eq!(descriptors[0].birth_date, date(1929, 1, 20));
    assert_eq!(descriptors[0].name, "Jimmy Cobb");
}

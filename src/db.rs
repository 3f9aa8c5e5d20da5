//! Read-only queries against the player's `songdata.db`.

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{DuplicateGroups, SongRecord};

const DUPLICATE_SQL: &str = "SELECT sha256, path FROM song
     WHERE sha256 IN (SELECT sha256 FROM song GROUP BY sha256 HAVING COUNT(sha256) > 1)
     ORDER BY sha256 ASC";

const TITLE_PREFIX_SQL: &str = "SELECT sha256, title, path FROM song
     WHERE title LIKE ?1 ESCAPE '\\'";

/// Open the song database without write access. The schema belongs to the player.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Group every song whose hash appears more than once.
/// `resolve` anchors each stored path (relative paths are library-relative).
pub fn read_duplicate_groups(
    conn: &Connection,
    resolve: impl Fn(&Path) -> PathBuf,
) -> Result<DuplicateGroups> {
    let mut stmt = conn.prepare(DUPLICATE_SQL)?;
    let mut rows = stmt.query([])?;

    let mut groups = DuplicateGroups::new();
    while let Some(row) = rows.next()? {
        let sha256: String = row.get(0)?;
        let path: String = row.get(1)?;
        groups.push(&sha256, resolve(Path::new(&path)));
    }
    Ok(groups)
}

/// Opens `db_path`, reads the duplicate groups and closes the connection.
pub fn load_duplicate_groups(
    db_path: &Path,
    resolve: impl Fn(&Path) -> PathBuf,
) -> Result<DuplicateGroups> {
    let conn = open_read_only(db_path)?;
    read_duplicate_groups(&conn, resolve)
}

/// Songs whose title starts with `prefix`. LIKE wildcards in the prefix match literally.
pub fn search_title_prefix(conn: &Connection, prefix: &str) -> Result<Vec<SongRecord>> {
    let pattern = format!("{}%", escape_like(prefix));
    let mut stmt = conn.prepare(TITLE_PREFIX_SQL)?;
    let songs = stmt
        .query_map([pattern], |row| {
            let path: String = row.get(2)?;
            Ok(SongRecord {
                sha256: row.get(0)?,
                title: row.get(1)?,
                path: PathBuf::from(path),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(songs)
}

pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song_db(rows: &[(&str, &str, &str)]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE song (sha256 TEXT, md5 TEXT, title TEXT, path TEXT, folder TEXT)",
        )
        .unwrap();
        for (sha, title, path) in rows {
            conn.execute(
                "INSERT INTO song (sha256, title, path) VALUES (?1, ?2, ?3)",
                [sha, title, path],
            )
            .unwrap();
        }
        conn
    }

    #[test]
    fn test_duplicate_groups_only_shared_hashes() {
        let conn = song_db(&[
            ("bbb", "B", "/lib/B1/b.bms"),
            ("aaa", "A", "/lib/A1/a.bms"),
            ("ccc", "C", "/lib/C/c.bms"),
            ("bbb", "B", "/lib/B2/b.bms"),
            ("aaa", "A", "/lib/A2/a.bms"),
            ("aaa", "A", "/lib/A3/a.bms"),
        ]);

        let groups = read_duplicate_groups(&conn, Path::to_path_buf).unwrap();
        let hashes: Vec<&str> = groups.iter().map(|g| g.sha256.as_str()).collect();
        assert_eq!(hashes, vec!["aaa", "bbb"]);
        assert!(groups.get("ccc").is_none());
        assert_eq!(groups.get("aaa").unwrap().paths.len(), 3);
        assert_eq!(groups.duplicate_count(), 3);
    }

    #[test]
    fn test_relative_paths_resolved() {
        let conn = song_db(&[("h", "T", "bms/A/x.bms"), ("h", "T", "/abs/B/x.bms")]);
        let root = PathBuf::from("/player");
        let groups =
            read_duplicate_groups(&conn, |p| crate::library::resolve_against(&root, p)).unwrap();
        let group = groups.get("h").unwrap();
        assert_eq!(group.paths[0], PathBuf::from("/player/bms/A/x.bms"));
        assert_eq!(group.paths[1], PathBuf::from("/abs/B/x.bms"));
    }

    #[test]
    fn test_title_prefix_search() {
        let conn = song_db(&[
            ("1", "Freedom Dive", "/lib/fd/a.bms"),
            ("2", "freedom dive [ANOTHER]", "/lib/fd/b.bms"),
            ("3", "Air", "/lib/air/a.bms"),
        ]);
        let songs = search_title_prefix(&conn, "Freedom").unwrap();
        assert_eq!(songs.len(), 2);
        assert!(songs.iter().all(|s| s.title.to_lowercase().starts_with("freedom")));
    }

    #[test]
    fn test_title_prefix_wildcards_literal() {
        let conn = song_db(&[
            ("1", "100% Trance", "/lib/a/a.bms"),
            ("2", "1000 Cranes", "/lib/b/b.bms"),
            ("3", "A_B", "/lib/c/c.bms"),
            ("4", "AxB", "/lib/d/d.bms"),
        ]);
        let songs = search_title_prefix(&conn, "100%").unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "100% Trance");

        let songs = search_title_prefix(&conn, "A_").unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "A_B");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}

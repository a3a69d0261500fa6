//! Pure operations over the bookmark tree.

use std::collections::HashMap;

use tabwise_protocols::types::{BookmarkNode, BookmarkRecord, DuplicateGroup};

/// Depth-first list of URL-bearing nodes; folders are skipped.
pub fn flatten_bookmarks(nodes: &[BookmarkNode]) -> Vec<BookmarkRecord> {
    fn walk(nodes: &[BookmarkNode], out: &mut Vec<BookmarkRecord>) {
        for node in nodes {
            if let Some(url) = &node.url {
                out.push(BookmarkRecord {
                    id: node.id.clone(),
                    title: node.title.clone(),
                    url: url.clone(),
                    date_added: node.date_added,
                    parent_id: node.parent_id.clone(),
                });
            }
            walk(&node.children, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, &mut out);
    out
}

/// Groups of bookmarks sharing an exact URL, largest first. Groups of equal
/// size keep the order in which their URL was first seen.
pub fn find_duplicate_bookmarks(records: &[BookmarkRecord]) -> Vec<DuplicateGroup> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_url: HashMap<&str, Vec<BookmarkRecord>> = HashMap::new();

    for record in records {
        by_url
            .entry(record.url.as_str())
            .or_insert_with(|| {
                order.push(record.url.as_str());
                Vec::new()
            })
            .push(record.clone());
    }

    let mut groups: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|url| by_url.remove(url).map(|bookmarks| (url, bookmarks)))
        .filter(|(_, bookmarks)| bookmarks.len() > 1)
        .map(|(url, bookmarks)| DuplicateGroup {
            url: url.to_string(),
            count: bookmarks.len(),
            bookmarks,
        })
        .collect();

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Case-insensitive substring match on title or URL, at most `limit` hits.
pub fn search_bookmarks<'a>(
    records: &'a [BookmarkRecord],
    query: &str,
    limit: usize,
) -> Vec<&'a BookmarkRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|b| b.title.to_lowercase().contains(&needle) || b.url.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 整理輸入根路徑
///
/// 轉為絕對路徑、移除不存在的路徑與重複項目，位於其他根路徑之下的項目
/// 由上層取代。結果依深度排序，同深度依字典序
#[must_use]
pub fn normalize_roots(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = inputs
        .iter()
        .filter_map(|input| match fs::canonicalize(input) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("略過無效的輸入路徑 {}: {e}", input.display());
                None
            }
        })
        .collect();

    candidates.sort_by(|a, b| depth(a).cmp(&depth(b)).then_with(|| a.cmp(b)));
    candidates.dedup();

    let mut roots: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if roots.iter().any(|root| candidate.starts_with(root)) {
            debug!("已由上層路徑涵蓋: {}", candidate.display());
            continue;
        }
        roots.push(candidate);
    }

    roots
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_nested_roots_collapse_to_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = a.join("b");
        let c = temp_dir.path().join("c");
        fs::create_dir_all(&b).unwrap();
        fs::create_dir_all(&c).unwrap();

        let roots = normalize_roots(&[a.clone(), b, c.clone()]);
        assert_eq!(
            roots,
            vec![a.canonicalize().unwrap(), c.canonicalize().unwrap()]
        );
    }

    #[test]
    fn test_child_listed_first_still_collapses() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let clip = a.join("deep").join("clip.mp4");
        fs::create_dir_all(clip.parent().unwrap()).unwrap();
        fs::write(&clip, b"x").unwrap();

        let roots = normalize_roots(&[clip, a.clone()]);
        assert_eq!(roots, vec![a.canonicalize().unwrap()]);
    }

    #[test]
    fn test_missing_and_repeated_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        fs::create_dir(&a).unwrap();

        let roots = normalize_roots(&[
            temp_dir.path().join("missing"),
            a.clone(),
            a.join(".").join("..").join("a"),
        ]);
        assert_eq!(roots, vec![a.canonicalize().unwrap()]);
        assert!(normalize_roots(&[]).is_empty());
    }

    #[test]
    fn test_siblings_sorted_by_depth_then_name() {
        let temp_dir = TempDir::new().unwrap();
        let z = temp_dir.path().join("z");
        let m = temp_dir.path().join("m");
        let deep = temp_dir.path().join("k").join("deep");
        for dir in [&z, &m, &deep] {
            fs::create_dir_all(dir).unwrap();
        }

        let roots = normalize_roots(&[deep.clone(), z.clone(), m.clone()]);
        assert_eq!(
            roots,
            vec![
                m.canonicalize().unwrap(),
                z.canonicalize().unwrap(),
                deep.canonicalize().unwrap(),
            ]
        );
    }
}

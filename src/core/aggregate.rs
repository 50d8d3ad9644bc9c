use crate::domain::model::{AlbumAggregate, RevenueLine};

pub const NO_ALBUM_LABEL: &str = "(앨범 없음)";

/// 單一藝人的營收彙總
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    /// 依 (album, service) 排序的明細
    pub lines: Vec<RevenueLine>,
    /// 依 album 排序的專輯小計
    pub albums: Vec<AlbumAggregate>,
    pub total_service_revenue: f64,
    pub total_album_revenue: f64,
}

impl RevenueSummary {
    pub fn albums_label(&self) -> String {
        if self.albums.is_empty() {
            NO_ALBUM_LABEL.to_string()
        } else {
            self.albums
                .iter()
                .map(|a| a.album.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// 排序並彙總藝人的營收明細。
///
/// 排序後同一專輯的明細必定相鄰，因此專輯小計與總額在同一次走訪中以相同的加法順序累計，
/// 兩種分組的總額必然相等。
pub fn summarize(lines: &[RevenueLine]) -> RevenueSummary {
    let mut sorted = lines.to_vec();
    sorted.sort_by(|a, b| (&a.album, &a.service).cmp(&(&b.album, &b.service)));

    let mut albums: Vec<AlbumAggregate> = Vec::new();
    for line in &sorted {
        match albums.last_mut() {
            Some(current) if current.album == line.album => {
                current.total_revenue += line.net_revenue;
            }
            _ => albums.push(AlbumAggregate {
                album: line.album.clone(),
                total_revenue: line.net_revenue,
            }),
        }
    }

    let total = albums.iter().fold(0.0, |acc, a| acc + a.total_revenue);

    RevenueSummary {
        lines: sorted,
        albums,
        total_service_revenue: total,
        total_album_revenue: total,
    }
}

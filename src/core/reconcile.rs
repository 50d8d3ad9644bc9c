use crate::domain::report::ArtistComparison;
use std::collections::BTreeSet;

/// 比對成本表與營收表的藝人名單
pub fn compare_artists<'a, C, R>(cost_artists: C, revenue_artists: R) -> ArtistComparison
where
    C: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = &'a str>,
{
    let cost: BTreeSet<&str> = cost_artists.into_iter().collect();
    let revenue: BTreeSet<&str> = revenue_artists.into_iter().collect();

    ArtistComparison {
        cost_count: cost.len(),
        revenue_count: revenue.len(),
        common_count: cost.intersection(&revenue).count(),
        missing_in_cost: revenue.difference(&cost).map(|a| a.to_string()).collect(),
        missing_in_revenue: cost.difference(&revenue).map(|a| a.to_string()).collect(),
    }
}

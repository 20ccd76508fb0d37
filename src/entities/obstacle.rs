use super::rect::Rect;
use crate::config::{
    OBSTACLE_CELL, OBSTACLE_CLUSTER_PITCH, OBSTACLE_CLUSTERS, OBSTACLE_COLUMNS, OBSTACLE_LEFT_X,
    OBSTACLE_ROWS, OBSTACLE_TOP_Y,
};

/// One destructible cell of a shield cluster
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub cluster: usize,
}

/// Lays out the four shield clusters, row-major within each cluster
pub fn build_obstacles() -> Vec<Obstacle> {
    let mut cells = Vec::with_capacity(OBSTACLE_CLUSTERS * OBSTACLE_ROWS * OBSTACLE_COLUMNS);
    for cluster in 0..OBSTACLE_CLUSTERS {
        let left = OBSTACLE_LEFT_X + OBSTACLE_CLUSTER_PITCH * cluster as i32;
        for row in 0..OBSTACLE_ROWS {
            for column in 0..OBSTACLE_COLUMNS {
                cells.push(Obstacle {
                    rect: Rect::new(
                        left + column as i32 * OBSTACLE_CELL,
                        OBSTACLE_TOP_Y + row as i32 * OBSTACLE_CELL,
                        OBSTACLE_CELL,
                        OBSTACLE_CELL,
                    ),
                    cluster,
                });
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_four_clusters() {
        let cells = build_obstacles();
        assert_eq!(cells.len(), 4 * 4 * 9);
        for cluster in 0..4 {
            assert_eq!(cells.iter().filter(|c| c.cluster == cluster).count(), 36);
        }
    }

    #[test]
    fn test_cluster_placement() {
        let cells = build_obstacles();
        assert_eq!(cells[0].rect, Rect::new(50, 450, 10, 10));
        let last = cells.last().unwrap();
        assert_eq!(last.rect, Rect::new(50 + 600 + 80, 480, 10, 10));
    }

    #[test]
    fn test_cells_do_not_overlap() {
        let cells = build_obstacles();
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert!(!a.rect.intersects(&b.rect));
            }
        }
    }
}

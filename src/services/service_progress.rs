//! Progreso del checklist de un servicio

use serde::Serialize;

use crate::models::ServiceChecklistItem;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

/// Porcentaje redondeado de items completados; 0 si no hay items
pub fn progress<I>(completed_flags: I) -> ChecklistProgress
where
    I: IntoIterator<Item = bool>,
{
    let (completed, total) = completed_flags
        .into_iter()
        .fold((0usize, 0usize), |(done, total), flag| (done + usize::from(flag), total + 1));

    let percentage = if total == 0 {
        0
    } else {
        // redondeo a la unidad más cercana, siempre dentro de [0, 100]
        ((completed * 100 + total / 2) / total) as u8
    };

    ChecklistProgress {
        completed,
        total,
        percentage,
    }
}

pub fn checklist_progress(items: &[ServiceChecklistItem]) -> ChecklistProgress {
    progress(items.iter().map(|item| item.completed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(progress(Vec::new()).percentage, 0);
    }

    #[test]
    fn test_basic_percentages() {
        assert_eq!(progress([true]).percentage, 100);
        assert_eq!(progress([true, false]).percentage, 50);
        assert_eq!(progress([false, false]).percentage, 0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(progress([true, false, false]).percentage, 33);
        assert_eq!(progress([true, true, false]).percentage, 67);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = progress([true, false, true, false]);
        let b = progress([false, false, true, true]);
        assert_eq!(a, b);
        assert_eq!(a.completed, 2);
        assert_eq!(a.total, 4);
    }
}

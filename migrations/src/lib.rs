use sea_orm_migration::prelude::*;

pub mod m20250301_000001_create_road_traffic_overall;
pub mod m20250301_000002_create_congestion_sections;
pub mod m20250301_000003_create_traffic_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_road_traffic_overall::Migration),
            Box::new(m20250301_000002_create_congestion_sections::Migration),
            Box::new(m20250301_000003_create_traffic_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_run_parent_table_first() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "m20250301_000001_create_road_traffic_overall",
                "m20250301_000002_create_congestion_sections",
                "m20250301_000003_create_traffic_indexes",
            ]
        );
    }
}

use chrono::{DateTime, FixedOffset, Utc};
use fake::{
    faker::{
        internet::en::SafeEmail,
        job::en::Title,
        name::en::{FirstName, LastName},
    },
    Dummy, Fake, Faker,
};

use crate::{
    core::test_utils::MockApi,
    model::employee::{AccountStatus, Employee},
};

pub struct EmployeeFactory<T: Clone> {
    modifier_one: fn(x: &Employee, ext: T) -> Employee,
    modifier_many: fn(x: &Employee, idx: usize, ext: T) -> Employee,
}

impl<T: Clone> Default for EmployeeFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> EmployeeFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Employee, ext: T) -> Employee) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Employee, idx: usize, ext: T) -> Employee) {
        self.modifier_many = modifier
    }

    pub fn generate_one(&mut self, api: &MockApi, ext: T) -> anyhow::Result<Employee> {
        let data = EmployeeDummy::generate_one();
        let data = (self.modifier_one)(&data, ext);
        Ok(api.store().insert_employee(data))
    }

    pub fn generate_many(
        &mut self,
        api: &MockApi,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Employee>> {
        let mut store = api.store();
        let mut result: Vec<Employee> = vec![];
        for idx in 0..num as usize {
            let data = EmployeeDummy::generate_one();
            // keep emails unique across the batch
            let data = Employee {
                email: format!("{}.{}", idx, data.email),
                ..data
            };
            let data = (self.modifier_many)(&data, idx, ext.clone());
            result.push(store.insert_employee(data));
        }
        Ok(result)
    }
}

#[derive(Debug, Dummy, Clone)]
struct EmployeeDummy {
    #[dummy(faker = "FirstName()")]
    pub first_name: String,
    #[dummy(faker = "LastName()")]
    pub last_name: String,
    #[dummy(faker = "SafeEmail()")]
    pub email: String,
    #[dummy(faker = "Title()")]
    pub job_title: String,
    pub is_active: bool,
    pub date_created: Option<DateTime<FixedOffset>>,
}

impl EmployeeDummy {
    pub fn generate_one() -> Employee {
        let dummy = Faker.fake::<EmployeeDummy>();
        let date_created = dummy.date_created.map(|x| x.with_timezone(&Utc).fixed_offset());
        Employee {
            employee_id: 0,
            first_name: dummy.first_name,
            last_name: dummy.last_name,
            email: dummy.email,
            job_title: dummy.job_title,
            account_status: if dummy.is_active {
                AccountStatus::Active
            } else {
                AccountStatus::Inactive
            },
            date_created,
            date_modified: date_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        core::test_utils::spawn_mock_api,
        factory::employee::EmployeeFactory,
        model::employee::{AccountStatus, Employee},
    };

    #[tokio::test]
    async fn test_generate_one() -> anyhow::Result<()> {
        // Given
        let api = spawn_mock_api().await?;

        // When
        let mut factory = EmployeeFactory::new();
        let employee = factory.generate_one(&api, ())?;

        // Expect
        assert_eq!(api.store().employees.len(), 1);
        assert_eq!(employee.employee_id, 1);
        assert!(!employee.email.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_many_modified() -> anyhow::Result<()> {
        // Given
        let api = spawn_mock_api().await?;
        let mut factory = EmployeeFactory::<AccountStatus>::new();
        factory.modified_many(|data, idx, ext| Employee {
            account_status: if idx % 2 == 0 { ext } else { ext.toggled() },
            ..data.clone()
        });

        // When
        let employees = factory.generate_many(&api, 5, AccountStatus::Inactive)?;

        // Expect
        assert_eq!(employees.len(), 5);
        let ids: Vec<i64> = employees.iter().map(|x| x.employee_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        for (idx, item) in employees.iter().enumerate() {
            if idx % 2 == 0 {
                assert_eq!(item.account_status, AccountStatus::Inactive);
            } else {
                assert_eq!(item.account_status, AccountStatus::Active);
            }
        }
        Ok(())
    }
}

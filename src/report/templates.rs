use super::template::Template;

const ID_CARD: &str = r#"<div class="id-card">
  <header>
    <img class="logo" src="{{ assets.logoUrl }}" alt="">
    <h1>{{ assets.schoolName | upper }}</h1>
  </header>
  <img class="photo" src="{{ record.profilePhoto.url }}" alt="">
  <h2>{{ record.fullName }}</h2>
  <p class="role">{{ record.kindLabel }}</p>
  <dl>
    <dt>ID</dt><dd>{{ record.admissionNumber }}{{ record.employment.employeeId }}</dd>
    <dt>Class</dt><dd>{{ record.classId }} {{ record.section }}</dd>
    <dt>Phone</dt><dd>{{ record.phone }}</dd>
    <dt>Blood group</dt><dd>{{ record.medicalInfo.bloodGroup }}</dd>
  </dl>
  <img class="qr" src="{{ record.qrCodeUrl }}" alt="">
  <footer>Valid until {{ assets.validUntil | date }}</footer>
</div>
"#;

const ADMISSION_LETTER: &str = r#"<article class="letter">
  <header><img src="{{ assets.logoUrl }}" alt=""><h1>{{ assets.schoolName }}</h1><p>{{ assets.schoolAddress }}</p></header>
  <p class="date">{{ assets.issueDate | date }}</p>
  <p>Dear {{ record.contactName }},</p>
  <p>We are pleased to confirm the admission of <strong>{{ record.fullName }}</strong>
     (admission no. {{ record.admissionNumber }}) to class {{ record.classId }} {{ record.section }},
     effective {{ record.academicInfo.admissionDate | date }}.</p>
  <p>Date of birth: {{ record.dateOfBirth | date }}</p>
  <p>Sincerely,<br>{{ assets.signatory }}</p>
</article>
"#;

const EXPERIENCE_LETTER: &str = r#"<article class="letter">
  <header><img src="{{ assets.logoUrl }}" alt=""><h1>{{ assets.schoolName }}</h1><p>{{ assets.schoolAddress }}</p></header>
  <p class="date">{{ assets.issueDate | date }}</p>
  <h2>To whom it may concern</h2>
  <p>This is to certify that <strong>{{ record.fullName }}</strong> has been employed with us as
     {{ record.employment.designation }} since {{ record.employment.joiningDate | date }}.</p>
  <p>Qualifications:</p>
  <ul>
    {{#each record.employment.qualifications}}<li>{{ this.degree }}, {{ this.institution }} ({{ this.year }})</li>{{/each}}
  </ul>
  <p>{{ assets.signatory }}</p>
</article>
"#;

const SALARY_SLIP: &str = r#"<article class="salary-slip">
  <header><h1>{{ assets.schoolName }}</h1><h2>Salary slip {{ assets.period }}</h2></header>
  <p>{{ record.fullName }} · {{ record.employment.employeeId }}</p>
  <table>
    <tr><th>Basic salary</th><td>{{ record.payroll.basic | money }}</td></tr>
    <tr><th>Allowances</th><td>{{ record.payroll.allowances | money }}</td></tr>
    <tr><th>Gross</th><td>{{ record.payroll.gross | money }}</td></tr>
    <tr><th>Deductions</th><td>{{ record.payroll.deductions | money }}</td></tr>
    <tr class="net"><th>Net pay</th><td>{{ record.payroll.net | money }}</td></tr>
  </table>
  <p>Paid to {{ record.employment.bankAccount.bankName }} account {{ record.employment.bankAccount.accountNumber }}</p>
</article>
"#;

const ATTENDANCE_REPORT: &str = r#"<article class="attendance">
  <header><h1>{{ assets.schoolName }}</h1><h2>Attendance · {{ record.fullName }}</h2></header>
  <p>Present {{ record.attendance.present }} · Late {{ record.attendance.late }} · Absent {{ record.attendance.absent }} · Leave {{ record.attendance.leave }}</p>
  <p>Attendance: {{ record.attendance.percentage }}%</p>
  <table>
    {{#each record.attendanceEntries}}<tr><td>{{ this.date | date }}</td><td>{{ this.status }}</td></tr>{{/each}}
  </table>
</article>
"#;

pub fn id_card() -> Template {
    Template::new("id_card", ID_CARD)
}

pub fn admission_letter() -> Template {
    Template::new("admission_letter", ADMISSION_LETTER)
}

pub fn experience_letter() -> Template {
    Template::new("experience_letter", EXPERIENCE_LETTER)
}

pub fn salary_slip() -> Template {
    Template::new("salary_slip", SALARY_SLIP)
}

pub fn attendance_report() -> Template {
    Template::new("attendance_report", ATTENDANCE_REPORT)
}
